//! Eased temporal resampling.
//!
//! [`ease`] holds the curve catalog, [`mapper`] turns a curve plus durations into per-frame
//! source instants, and [`planner`] lays several retimed segments end to end.

/// Easing curve catalog and cubic-Bézier timing curves.
pub mod ease;
/// Per-frame source instants for one retimed segment.
pub mod mapper;
/// Several retimed segments laid end to end.
pub mod planner;

pub use ease::Ease;
pub use mapper::{MapperOptions, TimestampPlan, frame_count, map_timestamps, map_timestamps_with};
pub use planner::{GlobalFrame, GlobalTimestampPlan, SegmentSpan, plan_segments};
