//! Adaptive grid decomposition.
//!
//! A contact sheet is profiled along each axis, the profile is thresholded adaptively, low
//! runs become gutter regions, and the resolver turns those into exactly `rows × cols` cell
//! boundaries. [`strategy`] bundles these stages behind [`GridDetectionStrategy`].

/// Low-variance runs turned into gutter regions.
pub mod gutter;
/// Detection results and diagnostics.
pub mod info;
/// Tunable detection parameters.
pub mod options;
/// Per-position uniformity profiles.
pub mod profile;
/// Gutter regions resolved into exact cell spans.
pub mod resolve;
/// Interchangeable detection strategies.
pub mod strategy;
/// Adaptive profile thresholding.
pub mod threshold;

pub use image::GrayImage;
pub use gutter::{GutterRegion, detect_gutters, min_gutter_width};
pub use info::{AxisDiagnostics, GridDiagnostics, GridInfo};
pub use options::{
    GridOptions, GutterConfig, ProfileSampling, ResolverConfig, StrategyKind, ThresholdConfig,
};
pub use profile::{VarianceProfile, projection_profile, variance_profile};
pub use resolve::{AxisLayout, CellBoundary, Divider, Span, cells_from_layouts, resolve_axis};
pub use strategy::{
    AutoStrategy, EqualDivisionStrategy, GridDetectionStrategy, ProjectionStrategy,
    VarianceStrategy, create_strategy,
};
pub use threshold::adaptive_threshold;
