//! Encoding sinks.
//!
//! Sinks consume retimed frames in output order and are driven by
//! [`crate::retime::render_plan`].

/// `ffmpeg`-based MP4 sink.
pub mod ffmpeg;
/// Frame sink trait and the in-memory sink.
pub mod sink;

pub use ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir};
pub use sink::{FrameSink, InMemorySink, SinkConfig};
