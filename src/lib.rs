//! seamcut turns AI-generated contact sheets into frames and retimes video clips so that hard
//! cuts between them land in slow motion.
//!
//! Two engines make up the crate:
//!
//! - **Grid decomposition** ([`grid`], [`crop`]): find the gutters of an R×C contact sheet
//!   without knowing its geometry, crop every cell and normalize them to one size.
//! - **Eased retiming** ([`timing`], [`retime`]): map each output frame of a speed-ramped
//!   segment to a source instant, lay several segments end to end, then decode and encode
//!   the result through a [`VideoBackend`] and a [`FrameSink`].
//!
//! ```
//! use seamcut::{Ease, Fps, map_timestamps};
//!
//! let plan = map_timestamps(Ease::InOutCubic, 4.0, 1.5, Fps::new(60, 1)?)?;
//! assert_eq!(plan.len(), 90);
//! # Ok::<(), seamcut::SeamError>(())
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// File-based configuration and logging setup.
pub mod config;
/// Cell cropping and size normalization.
pub mod crop;
/// Encoding sinks.
pub mod encode;
/// Adaptive grid decomposition.
pub mod grid;
/// Video probing and frame decoding.
pub mod media;
/// Parallel extraction of retimed frames into a sink.
pub mod retime;
/// Easing curves and timestamp planning.
pub mod timing;

pub use crate::foundation::core::{Axis, Fps, FrameIndex, FrameRange, Rgba8};
pub use crate::foundation::error::{SeamError, SeamResult};

pub use crate::config::{LoggingConfig, SeamConfig, init_logging};
pub use crate::crop::{
    Decomposition, ImageRaster, NormalizedDimensions, RasterBackend, decompose_image,
    normalize_cells, write_cells,
};
pub use crate::encode::{FfmpegSink, FfmpegSinkOpts, FrameSink, InMemorySink, SinkConfig};
pub use crate::grid::{
    CellBoundary, GrayImage, GridDetectionStrategy, GridDiagnostics, GridInfo, GridOptions,
    StrategyKind, create_strategy,
};
pub use crate::media::{FfmpegVideo, FrameRGBA, VideoBackend, VideoSourceInfo};
pub use crate::retime::{
    RetimeOptions, RetimeStats, RetimeThreading, render_plan, retime_files,
};
pub use crate::timing::{
    Ease, GlobalFrame, GlobalTimestampPlan, MapperOptions, SegmentSpan, TimestampPlan,
    map_timestamps, plan_segments,
};
