//! Video collaborators: probing clips and decoding single frames.

/// `ffprobe`/`ffmpeg` backed video collaborator.
pub mod ffmpeg;
/// Decoded RGBA frames.
pub mod frame;

use std::path::{Path, PathBuf};

use crate::foundation::core::Fps;
use crate::foundation::error::SeamResult;

pub use ffmpeg::{FfmpegVideo, ffmpeg_tools_available};
pub use frame::FrameRGBA;

/// Basic metadata about a source video file.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoSourceInfo {
    /// Path used for probing and decoding.
    pub source_path: PathBuf,
    /// Duration in seconds.
    pub duration_sec: f64,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Native frame rate, when the container reports one.
    pub frame_rate: Option<Fps>,
}

/// Source of decoded frames for the retime pipeline.
///
/// `extract_frame` is called concurrently from the extraction pool.
pub trait VideoBackend: Sync {
    /// Read duration and geometry of the clip at `path`.
    fn probe(&self, path: &Path) -> SeamResult<VideoSourceInfo>;

    /// Decode the frame shown at `time_sec`.
    fn extract_frame(&self, info: &VideoSourceInfo, time_sec: f64) -> SeamResult<FrameRGBA>;
}
