use image::GrayImage;

use crate::foundation::core::Axis;
use crate::foundation::error::{SeamError, SeamResult};
use crate::grid::gutter::{detect_gutters, min_gutter_width};
use crate::grid::info::{AxisDiagnostics, GridDiagnostics, GridInfo};
use crate::grid::options::{GridOptions, StrategyKind, ThresholdConfig};
use crate::grid::profile::{VarianceProfile, projection_profile, variance_profile};
use crate::grid::resolve::{AxisLayout, cells_from_layouts, resolve_axis};
use crate::grid::threshold::adaptive_threshold;

/// Interchangeable way of locating an R×C grid in an image.
pub trait GridDetectionStrategy: Send + Sync {
    /// Short stable name, recorded in diagnostics.
    fn name(&self) -> &'static str;

    /// Resolve `rows × cols` cells in `image`.
    fn detect(&self, image: &GrayImage, rows: u32, cols: u32) -> SeamResult<GridInfo>;
}

/// Build the strategy selected by `kind`.
pub fn create_strategy(kind: StrategyKind, opts: &GridOptions) -> Box<dyn GridDetectionStrategy> {
    match kind {
        StrategyKind::Auto => Box::new(AutoStrategy::new(opts.clone())),
        StrategyKind::Variance => Box::new(VarianceStrategy::new(opts.clone())),
        StrategyKind::Projection => Box::new(ProjectionStrategy::new(opts.clone())),
        StrategyKind::Equal => Box::new(EqualDivisionStrategy::new(opts.clone())),
    }
}

/// Gutters are lines whose sampled perpendicular intensities have low variance.
#[derive(Clone, Debug, Default)]
pub struct VarianceStrategy {
    opts: GridOptions,
}

impl VarianceStrategy {
    /// Create the strategy with `opts`.
    pub fn new(opts: GridOptions) -> Self {
        Self { opts }
    }
}

impl GridDetectionStrategy for VarianceStrategy {
    fn name(&self) -> &'static str {
        "variance"
    }

    #[tracing::instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    fn detect(&self, image: &GrayImage, rows: u32, cols: u32) -> SeamResult<GridInfo> {
        detect_with_profile(
            self.name(),
            image,
            rows,
            cols,
            &self.opts,
            &self.opts.threshold,
            |img, axis| variance_profile(img, axis, &self.opts.sampling),
        )
    }
}

/// Gutters are lines that hold a single intensity along their full length.
#[derive(Clone, Debug, Default)]
pub struct ProjectionStrategy {
    opts: GridOptions,
}

impl ProjectionStrategy {
    /// Create the strategy with `opts`.
    pub fn new(opts: GridOptions) -> Self {
        Self { opts }
    }
}

impl GridDetectionStrategy for ProjectionStrategy {
    fn name(&self) -> &'static str {
        "projection"
    }

    #[tracing::instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    fn detect(&self, image: &GrayImage, rows: u32, cols: u32) -> SeamResult<GridInfo> {
        detect_with_profile(
            self.name(),
            image,
            rows,
            cols,
            &self.opts,
            &self.opts.projection_threshold,
            |img, axis| Ok(projection_profile(img, axis)),
        )
    }
}

/// Split the full image into equal cells without looking at pixels.
#[derive(Clone, Debug, Default)]
pub struct EqualDivisionStrategy {
    opts: GridOptions,
}

impl EqualDivisionStrategy {
    /// Create the strategy with `opts`.
    pub fn new(opts: GridOptions) -> Self {
        Self { opts }
    }
}

impl GridDetectionStrategy for EqualDivisionStrategy {
    fn name(&self) -> &'static str {
        "equal"
    }

    fn detect(&self, image: &GrayImage, rows: u32, cols: u32) -> SeamResult<GridInfo> {
        self.opts.validate()?;
        check_counts(image, rows, cols)?;
        let col_layout = resolve_axis(
            Axis::Columns,
            &[],
            cols,
            image.width(),
            &self.opts.resolver,
        )?;
        let row_layout = resolve_axis(Axis::Rows, &[], rows, image.height(), &self.opts.resolver)?;
        let mut info = assemble(
            self.name(),
            rows,
            cols,
            &row_layout,
            &col_layout,
            [None, None],
            [None, None],
        );
        // Equal division is exact by construction, not a degraded detection.
        info.degraded = false;
        info.diagnostics.confidence = 1.0;
        Ok(info)
    }
}

/// Variance, then projection, then equal division: the first detection strategy whose
/// confidence reaches `min_confidence` wins.
#[derive(Clone, Debug, Default)]
pub struct AutoStrategy {
    opts: GridOptions,
}

impl AutoStrategy {
    /// Create the strategy with `opts`.
    pub fn new(opts: GridOptions) -> Self {
        Self { opts }
    }
}

impl GridDetectionStrategy for AutoStrategy {
    fn name(&self) -> &'static str {
        "auto"
    }

    #[tracing::instrument(skip(self, image))]
    fn detect(&self, image: &GrayImage, rows: u32, cols: u32) -> SeamResult<GridInfo> {
        self.opts.validate()?;
        check_counts(image, rows, cols)?;

        let candidates: [Box<dyn GridDetectionStrategy>; 2] = [
            Box::new(VarianceStrategy::new(self.opts.clone())),
            Box::new(ProjectionStrategy::new(self.opts.clone())),
        ];
        let mut rejected = Vec::new();
        for strategy in &candidates {
            match strategy.detect(image, rows, cols) {
                Ok(mut info) if info.diagnostics.confidence >= self.opts.min_confidence => {
                    info.diagnostics.rejected = rejected;
                    return Ok(info);
                }
                Ok(info) => {
                    tracing::debug!(
                        strategy = strategy.name(),
                        confidence = info.diagnostics.confidence,
                        "grid detection below confidence threshold"
                    );
                    rejected.push(format!(
                        "{}: confidence {:.3} < {:.3}",
                        strategy.name(),
                        info.diagnostics.confidence,
                        self.opts.min_confidence
                    ));
                }
                Err(SeamError::Detection(msg)) => {
                    rejected.push(format!("{}: {msg}", strategy.name()));
                }
                Err(e) => return Err(e),
            }
        }

        tracing::warn!(
            rows,
            cols,
            "adaptive grid detection degraded, falling back to equal division"
        );
        let mut info = EqualDivisionStrategy::new(self.opts.clone()).detect(image, rows, cols)?;
        info.degraded = true;
        info.diagnostics.rejected = rejected;
        Ok(info)
    }
}

fn check_counts(image: &GrayImage, rows: u32, cols: u32) -> SeamResult<()> {
    if rows == 0 || cols == 0 {
        return Err(SeamError::validation(format!(
            "grid must have at least one row and column, got {rows}x{cols}"
        )));
    }
    if image.width() < cols || image.height() < rows {
        return Err(SeamError::detection(format!(
            "{}x{} image cannot hold a {rows}x{cols} grid",
            image.width(),
            image.height()
        )));
    }
    Ok(())
}

fn detect_with_profile(
    name: &'static str,
    image: &GrayImage,
    rows: u32,
    cols: u32,
    opts: &GridOptions,
    threshold_cfg: &ThresholdConfig,
    profile_fn: impl Fn(&GrayImage, Axis) -> SeamResult<VarianceProfile>,
) -> SeamResult<GridInfo> {
    opts.validate()?;
    check_counts(image, rows, cols)?;

    let mut layouts = Vec::with_capacity(2);
    let mut thresholds = [None, None];
    let mut min_widths = [None, None];
    for (slot, (axis, count)) in [(Axis::Columns, cols), (Axis::Rows, rows)]
        .into_iter()
        .enumerate()
    {
        let extent = axis.extent(image.width(), image.height());
        let profile = profile_fn(image, axis)?;
        let threshold = adaptive_threshold(&profile, threshold_cfg);
        let min_width = min_gutter_width(f64::from(extent) / f64::from(count), &opts.gutter);
        let regions = detect_gutters(&profile, threshold, min_width);
        tracing::debug!(
            strategy = name,
            ?axis,
            threshold,
            min_width,
            regions = regions.len(),
            "gutter scan"
        );
        layouts.push(resolve_axis(axis, &regions, count, extent, &opts.resolver)?);
        thresholds[slot] = Some(threshold);
        min_widths[slot] = Some(min_width);
    }

    let info = assemble(
        name,
        rows,
        cols,
        &layouts[1],
        &layouts[0],
        thresholds,
        min_widths,
    );
    if info.degraded {
        tracing::warn!(
            strategy = name,
            rows,
            cols,
            confidence = info.diagnostics.confidence,
            "divider shortfall; some cells were interpolated"
        );
    }
    Ok(info)
}

/// `thresholds` and `min_widths` are indexed `[columns, rows]`.
fn assemble(
    name: &str,
    rows: u32,
    cols: u32,
    row_layout: &AxisLayout,
    col_layout: &AxisLayout,
    thresholds: [Option<f64>; 2],
    min_widths: [Option<u32>; 2],
) -> GridInfo {
    let columns = AxisDiagnostics::from_layout(col_layout, thresholds[0], min_widths[0]);
    let row_diag = AxisDiagnostics::from_layout(row_layout, thresholds[1], min_widths[1]);
    let confidence = columns.confidence.min(row_diag.confidence);
    GridInfo {
        rows,
        cols,
        cells: cells_from_layouts(row_layout, col_layout),
        degraded: columns.shortfall || row_diag.shortfall,
        diagnostics: GridDiagnostics {
            strategy: name.to_owned(),
            rejected: Vec::new(),
            columns,
            rows: row_diag,
            confidence,
        },
    }
}

#[cfg(test)]
#[path = "../../tests/unit/grid/strategy.rs"]
mod tests;
