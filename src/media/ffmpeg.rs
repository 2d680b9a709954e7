use std::path::Path;

use crate::foundation::error::{SeamError, SeamResult};
use crate::media::frame::FrameRGBA;
use crate::media::{VideoBackend, VideoSourceInfo};

/// [`VideoBackend`] that shells out to the system `ffprobe` and `ffmpeg`.
///
/// Without the `media-ffmpeg` feature every call returns [`SeamError::Media`].
#[derive(Clone, Copy, Debug, Default)]
pub struct FfmpegVideo;

impl VideoBackend for FfmpegVideo {
    fn probe(&self, path: &Path) -> SeamResult<VideoSourceInfo> {
        probe_video(path)
    }

    fn extract_frame(&self, info: &VideoSourceInfo, time_sec: f64) -> SeamResult<FrameRGBA> {
        decode_frame_rgba8(info, time_sec)
    }
}

#[cfg(feature = "media-ffmpeg")]
fn probe_video(source_path: &Path) -> SeamResult<VideoSourceInfo> {
    use crate::foundation::core::Fps;

    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        r_frame_rate: Option<String>,
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| SeamError::media(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(SeamError::media(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| SeamError::media(format!("ffprobe json parse failed: {e}")))?;
    let video = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| {
            SeamError::media(format!(
                "no video stream found in '{}'",
                source_path.display()
            ))
        })?;
    let width = video
        .width
        .ok_or_else(|| SeamError::media("missing video width from ffprobe"))?;
    let height = video
        .height
        .ok_or_else(|| SeamError::media("missing video height from ffprobe"))?;

    // Container duration first; some muxers only report it per stream.
    let duration_sec = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .or(video.duration.as_deref())
        .and_then(|d| d.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
        .ok_or_else(|| {
            SeamError::media(format!(
                "ffprobe reported no duration for '{}'",
                source_path.display()
            ))
        })?;
    let frame_rate = video
        .r_frame_rate
        .as_deref()
        .and_then(|r| r.parse::<Fps>().ok());

    Ok(VideoSourceInfo {
        source_path: source_path.to_path_buf(),
        duration_sec,
        width,
        height,
        frame_rate,
    })
}

#[cfg(not(feature = "media-ffmpeg"))]
fn probe_video(_source_path: &Path) -> SeamResult<VideoSourceInfo> {
    Err(SeamError::media(
        "video sources require the 'media-ffmpeg' feature",
    ))
}

#[cfg(feature = "media-ffmpeg")]
fn decode_frame_rgba8(source: &VideoSourceInfo, time_sec: f64) -> SeamResult<FrameRGBA> {
    let expected_len = source.width as usize * source.height as usize * 4;
    if expected_len == 0 {
        return Err(SeamError::media(
            "decoded video frame size is zero (invalid source dimensions)",
        ));
    }

    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-ss", &format!("{time_sec:.6}")])
        .arg("-i")
        .arg(&source.source_path)
        .args([
            "-frames:v",
            "1",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "pipe:1",
        ])
        .output()
        .map_err(|e| SeamError::media(format!("failed to run ffmpeg for frame decode: {e}")))?;
    if !out.status.success() {
        return Err(SeamError::media(format!(
            "ffmpeg frame decode failed for '{}' at {time_sec:.3}s: {}",
            source.source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    if out.stdout.len() < expected_len {
        return Err(SeamError::media(format!(
            "ffmpeg returned {} bytes at {time_sec:.3}s in '{}', expected {expected_len}",
            out.stdout.len(),
            source.source_path.display()
        )));
    }

    let mut data = out.stdout;
    data.truncate(expected_len);
    FrameRGBA::new(source.width, source.height, data)
}

#[cfg(not(feature = "media-ffmpeg"))]
fn decode_frame_rgba8(_source: &VideoSourceInfo, _time_sec: f64) -> SeamResult<FrameRGBA> {
    Err(SeamError::media(
        "video sources require the 'media-ffmpeg' feature",
    ))
}

/// Return `true` when both `ffmpeg` and `ffprobe` can be invoked from `PATH`.
pub fn ffmpeg_tools_available() -> bool {
    ["ffmpeg", "ffprobe"].iter().all(|tool| {
        std::process::Command::new(tool)
            .arg("-version")
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    })
}

// Probing and decoding shell out to ffprobe/ffmpeg; they are covered by integration tests that
// skip when the tools are unavailable.
