use std::path::{Path, PathBuf};

use anyhow::Context as _;
use image::RgbaImage;

use crate::crop::raster::{NormalizedDimensions, RasterBackend};
use crate::foundation::core::Rgba8;
use crate::foundation::error::{SeamError, SeamResult};
use crate::grid::info::GridInfo;
use crate::grid::options::GridOptions;
use crate::grid::strategy::create_strategy;

/// Outcome of [`normalize_cells`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Size every cell now has.
    pub dims: NormalizedDimensions,
    /// Cells that had to be letterboxed.
    pub resized: usize,
}

/// A decomposed contact sheet: geometry plus equally sized cell images.
#[derive(Clone, Debug)]
pub struct Decomposition {
    /// Detected grid.
    pub grid: GridInfo,
    /// Cell images in row-major order, all `dims` in size.
    pub cells: Vec<RgbaImage>,
    /// Normalized cell size.
    pub dims: NormalizedDimensions,
    /// Cells letterboxed during normalization.
    pub resized: usize,
}

/// Crop every cell of `grid` out of `img`, row-major.
pub fn crop_cells(
    raster: &dyn RasterBackend,
    img: &RgbaImage,
    grid: &GridInfo,
) -> SeamResult<Vec<RgbaImage>> {
    grid.cells
        .iter()
        .map(|&cell| raster.crop(img, cell))
        .collect()
}

/// Largest width and largest height across `cells`; `None` for an empty slice.
pub fn normalized_dimensions(cells: &[RgbaImage]) -> Option<NormalizedDimensions> {
    cells.iter().fold(None, |acc, c| {
        let (w, h) = c.dimensions();
        Some(match acc {
            None => NormalizedDimensions {
                width: w,
                height: h,
            },
            Some(d) => NormalizedDimensions {
                width: d.width.max(w),
                height: d.height.max(h),
            },
        })
    })
}

/// Letterbox every cell whose size differs from the normalized size.
///
/// Cells already at the normalized size are left untouched, so a second call reports zero
/// resizes.
pub fn normalize_cells(
    raster: &dyn RasterBackend,
    cells: &mut [RgbaImage],
    fill: Rgba8,
) -> SeamResult<NormalizeReport> {
    let dims = normalized_dimensions(cells)
        .ok_or_else(|| SeamError::validation("no cells to normalize"))?;
    let mut resized = 0;
    for cell in cells.iter_mut() {
        if cell.dimensions() == (dims.width, dims.height) {
            continue;
        }
        *cell = raster.letterbox(cell, dims, fill)?;
        resized += 1;
    }
    if resized > 0 {
        tracing::debug!(
            resized,
            width = dims.width,
            height = dims.height,
            "letterboxed cells"
        );
    }
    Ok(NormalizeReport { dims, resized })
}

/// Save `cells` as `frame-1.png … frame-N.png` under `dir`, creating it if needed.
pub fn write_cells(cells: &[RgbaImage], dir: &Path) -> SeamResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;
    let mut paths = Vec::with_capacity(cells.len());
    for (i, cell) in cells.iter().enumerate() {
        let path = dir.join(format!("frame-{}.png", i + 1));
        cell.save(&path)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        paths.push(path);
    }
    Ok(paths)
}

/// Full pipeline: load, detect the `rows × cols` grid, crop and normalize.
#[tracing::instrument(skip(raster, opts), fields(path = %path.display()))]
pub fn decompose_image(
    raster: &dyn RasterBackend,
    path: &Path,
    rows: u32,
    cols: u32,
    opts: &GridOptions,
) -> SeamResult<Decomposition> {
    opts.validate()?;
    let img = raster.load(path)?;
    decompose_rgba(raster, &img, rows, cols, opts)
}

/// [`decompose_image`] for an already decoded raster.
pub fn decompose_rgba(
    raster: &dyn RasterBackend,
    img: &RgbaImage,
    rows: u32,
    cols: u32,
    opts: &GridOptions,
) -> SeamResult<Decomposition> {
    opts.validate()?;
    let gray = image::imageops::grayscale(img);
    let grid = create_strategy(opts.strategy, opts).detect(&gray, rows, cols)?;
    tracing::info!(
        strategy = %grid.diagnostics.strategy,
        confidence = grid.diagnostics.confidence,
        degraded = grid.degraded,
        "grid resolved"
    );

    let mut cells = crop_cells(raster, img, &grid)?;
    let report = normalize_cells(raster, &mut cells, opts.fill)?;
    Ok(Decomposition {
        grid,
        cells,
        dims: report.dims,
        resized: report.resized,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/crop/normalize.rs"]
mod tests;
