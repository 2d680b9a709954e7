use std::path::Path;

use anyhow::Context as _;
use image::{Rgba, RgbaImage, imageops};

use crate::foundation::core::Rgba8;
use crate::foundation::error::{SeamError, SeamResult};
use crate::grid::resolve::CellBoundary;

/// Common size every cell is normalized to: the largest width and height across cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NormalizedDimensions {
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels.
    pub height: u32,
}

/// Raster operations the cropper needs: load, crop and letterbox.
pub trait RasterBackend: Send + Sync {
    /// Decode the image at `path` to RGBA8.
    fn load(&self, path: &Path) -> SeamResult<RgbaImage>;

    /// Copy the pixels inside `cell` out of `img`.
    fn crop(&self, img: &RgbaImage, cell: CellBoundary) -> SeamResult<RgbaImage>;

    /// Scale `img` to fit `dims` keeping its aspect ratio, then center it on a `fill` canvas.
    fn letterbox(
        &self,
        img: &RgbaImage,
        dims: NormalizedDimensions,
        fill: Rgba8,
    ) -> SeamResult<RgbaImage>;
}

/// [`RasterBackend`] built on the `image` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageRaster;

impl RasterBackend for ImageRaster {
    fn load(&self, path: &Path) -> SeamResult<RgbaImage> {
        let img = image::open(path)
            .with_context(|| format!("decode image '{}'", path.display()))?;
        Ok(img.to_rgba8())
    }

    fn crop(&self, img: &RgbaImage, cell: CellBoundary) -> SeamResult<RgbaImage> {
        let (w, h) = img.dimensions();
        let fits = cell.width > 0
            && cell.height > 0
            && u64::from(cell.x) + u64::from(cell.width) <= u64::from(w)
            && u64::from(cell.y) + u64::from(cell.height) <= u64::from(h);
        if !fits {
            return Err(SeamError::validation(format!(
                "cell {cell:?} does not fit inside {w}x{h} image"
            )));
        }
        Ok(imageops::crop_imm(img, cell.x, cell.y, cell.width, cell.height).to_image())
    }

    fn letterbox(
        &self,
        img: &RgbaImage,
        dims: NormalizedDimensions,
        fill: Rgba8,
    ) -> SeamResult<RgbaImage> {
        let (w, h) = img.dimensions();
        if w == 0 || h == 0 || dims.width == 0 || dims.height == 0 {
            return Err(SeamError::validation(format!(
                "cannot letterbox {w}x{h} into {}x{}",
                dims.width, dims.height
            )));
        }
        let (fit_w, fit_h) = fit_within(w, h, dims);
        let mut canvas = RgbaImage::from_pixel(dims.width, dims.height, Rgba(fill.to_array()));
        let x = i64::from((dims.width - fit_w) / 2);
        let y = i64::from((dims.height - fit_h) / 2);
        if (fit_w, fit_h) == (w, h) {
            imageops::overlay(&mut canvas, img, x, y);
        } else {
            let scaled = imageops::resize(img, fit_w, fit_h, imageops::FilterType::Lanczos3);
            imageops::overlay(&mut canvas, &scaled, x, y);
        }
        Ok(canvas)
    }
}

/// Largest `w × h` with the aspect ratio of `(src_w, src_h)` that fits inside `dims`.
pub(crate) fn fit_within(src_w: u32, src_h: u32, dims: NormalizedDimensions) -> (u32, u32) {
    let scale = (f64::from(dims.width) / f64::from(src_w))
        .min(f64::from(dims.height) / f64::from(src_h));
    let w = (f64::from(src_w) * scale).round() as u32;
    let h = (f64::from(src_h) * scale).round() as u32;
    (w.clamp(1, dims.width), h.clamp(1, dims.height))
}

#[cfg(test)]
#[path = "../../tests/unit/crop/raster.rs"]
mod tests;
