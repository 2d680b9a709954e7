//! Cell cropping and size normalization.

/// Cropping, size normalization and cell output.
pub mod normalize;
/// Raster collaborator built on `image`.
pub mod raster;

pub use normalize::{
    Decomposition, NormalizeReport, crop_cells, decompose_image, decompose_rgba,
    normalize_cells, normalized_dimensions, write_cells,
};
pub use raster::{ImageRaster, NormalizedDimensions, RasterBackend};
