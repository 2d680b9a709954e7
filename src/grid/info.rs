use crate::foundation::core::Axis;
use crate::grid::resolve::{AxisLayout, CellBoundary};

/// Per-axis trace of one detection run.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct AxisDiagnostics {
    /// Axis described.
    pub axis: Axis,
    /// Adaptive threshold used, when a profile was thresholded.
    pub threshold: Option<f64>,
    /// Minimum gutter width used, when gutters were scanned.
    pub min_gutter_width: Option<u32>,
    /// Regions found, margins included.
    pub regions_found: usize,
    /// Regions that were not edge margins.
    pub internal_regions: usize,
    /// Dividers needed for the requested count.
    pub expected_dividers: u32,
    /// Chosen dividers backed by a detected gutter.
    pub detected_dividers: usize,
    /// Chosen dividers that were interpolated.
    pub synthetic_dividers: usize,
    /// Safety margin in pixels.
    pub margin: u32,
    /// Usable content interval `[content_start, content_end)`.
    pub content_start: u32,
    /// See `content_start`.
    pub content_end: u32,
    /// Fewer gutters than needed were detected.
    pub shortfall: bool,
    /// More gutters than needed were detected.
    pub excess: bool,
    /// Axis confidence in `[0, 1]`.
    pub confidence: f64,
}

impl AxisDiagnostics {
    pub(crate) fn from_layout(
        layout: &AxisLayout,
        threshold: Option<f64>,
        min_gutter_width: Option<u32>,
    ) -> Self {
        let detected = layout.detected_dividers();
        Self {
            axis: layout.axis,
            threshold,
            min_gutter_width,
            regions_found: layout.regions_found,
            internal_regions: layout.internal_regions,
            expected_dividers: layout.expected_dividers,
            detected_dividers: detected,
            synthetic_dividers: layout.dividers.len() - detected,
            margin: layout.margin,
            content_start: layout.content_start,
            content_end: layout.content_end,
            shortfall: layout.is_shortfall(),
            excess: layout.is_excess(),
            confidence: layout.confidence(),
        }
    }
}

/// Structured trace returned alongside a [`GridInfo`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct GridDiagnostics {
    /// Name of the strategy that produced the result.
    pub strategy: String,
    /// Strategies tried and rejected before this one, with the reason.
    pub rejected: Vec<String>,
    /// Vertical-divider axis.
    pub columns: AxisDiagnostics,
    /// Horizontal-divider axis.
    pub rows: AxisDiagnostics,
    /// `min(columns.confidence, rows.confidence)`.
    pub confidence: f64,
}

/// Resolved decomposition of one image.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct GridInfo {
    /// Row count.
    pub rows: u32,
    /// Column count.
    pub cols: u32,
    /// `rows * cols` boundaries in row-major order.
    pub cells: Vec<CellBoundary>,
    /// Detection fell short somewhere and geometry was interpolated.
    pub degraded: bool,
    /// How the result was reached.
    pub diagnostics: GridDiagnostics,
}

impl GridInfo {
    /// Boundary of the cell at `(row, col)`.
    pub fn cell(&self, row: u32, col: u32) -> Option<CellBoundary> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get((row * self.cols + col) as usize).copied()
    }
}
