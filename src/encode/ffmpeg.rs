use std::ffi::OsString;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use anyhow::Context as _;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, Rgba8};
use crate::foundation::error::{SeamError, SeamResult};
use crate::foundation::math::mul_div255_u16;
use crate::media::frame::FrameRGBA;

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Replace an existing file at `out_path`.
    pub overwrite: bool,
    /// Background used to flatten translucent pixels.
    pub background: Rgba8,
}

impl FfmpegSinkOpts {
    /// Options writing to `out_path`, overwriting, on black.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            background: Rgba8::BLACK,
        }
    }
}

/// Sink that streams raw RGBA frames into a system `ffmpeg` producing H.264/yuv420p MP4.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    encoder: Option<EncoderProcess>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
    opaque: Vec<u8>,
}

/// A running `ffmpeg` with its input pipe and a thread collecting its stderr.
struct EncoderProcess {
    child: Child,
    stdin: Option<ChildStdin>,
    stderr: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
}

impl EncoderProcess {
    fn spawn(args: &[OsString]) -> SeamResult<Self> {
        let mut child = Command::new("ffmpeg")
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    SeamError::media("ffmpeg is required for MP4 encoding but is not on PATH")
                }
                _ => SeamError::media(format!("failed to spawn ffmpeg: {e}")),
            })?;

        let stdin = child.stdin.take();
        let stderr = child.stderr.take().map(|mut pipe| {
            std::thread::spawn(move || {
                let mut buf = Vec::new();
                pipe.read_to_end(&mut buf)?;
                Ok(buf)
            })
        });
        if stdin.is_none() || stderr.is_none() {
            let _ = child.kill();
            let _ = child.wait();
            return Err(SeamError::media("ffmpeg pipes were not opened"));
        }
        Ok(Self {
            child,
            stdin,
            stderr,
        })
    }

    fn write(&mut self, bytes: &[u8]) -> SeamResult<()> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| SeamError::media("ffmpeg input is already closed"))?;
        stdin
            .write_all(bytes)
            .map_err(|e| SeamError::media(format!("ffmpeg stopped accepting frames: {e}")))
    }

    /// Close the input, wait for the process and surface its stderr on failure.
    fn finish(mut self) -> SeamResult<()> {
        drop(self.stdin.take());
        let status = self
            .child
            .wait()
            .map_err(|e| SeamError::media(format!("failed to wait for ffmpeg: {e}")))?;
        let log = match self.stderr.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| SeamError::media("ffmpeg stderr reader panicked"))?
                .unwrap_or_default(),
            None => Vec::new(),
        };
        if !status.success() {
            return Err(SeamError::media(format!(
                "ffmpeg exited with {status}: {}",
                String::from_utf8_lossy(&log).trim()
            )));
        }
        Ok(())
    }
}

impl Drop for EncoderProcess {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if self.stderr.is_some() {
            // Not finished: the encode was abandoned.
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

impl FfmpegSink {
    /// Sink writing to `opts.out_path`. Nothing is spawned until [`FrameSink::begin`].
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            encoder: None,
            cfg: None,
            last_idx: None,
            opaque: Vec::new(),
        }
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> SeamResult<()> {
        if self.encoder.is_some() {
            return Err(SeamError::validation(
                "ffmpeg sink already started; call end before beginning again",
            ));
        }
        check_sink_config(&cfg)?;
        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(SeamError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }

        let encoder = EncoderProcess::spawn(&encoder_args(&self.opts, &cfg))?;
        tracing::debug!(
            out = %self.opts.out_path.display(),
            width = cfg.width,
            height = cfg.height,
            fps = %cfg.fps,
            bitrate = cfg.bitrate.as_deref().unwrap_or("default"),
            "spawned ffmpeg encoder"
        );

        self.opaque = vec![0; cfg.width as usize * cfg.height as usize * 4];
        self.encoder = Some(encoder);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> SeamResult<()> {
        let (Some(cfg), Some(encoder)) = (self.cfg.as_ref(), self.encoder.as_mut()) else {
            return Err(SeamError::media("ffmpeg sink not started"));
        };
        if self.last_idx.is_some_and(|last| idx <= last) {
            return Err(SeamError::media(format!(
                "ffmpeg sink received frame {} out of order",
                idx.0
            )));
        }
        if (frame.width, frame.height) != (cfg.width, cfg.height)
            || frame.data.len() != self.opaque.len()
        {
            return Err(SeamError::validation(format!(
                "frame is {}x{}, sink expects {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }

        flatten_onto(self.opts.background, &frame.data, &mut self.opaque);
        encoder.write(&self.opaque)?;
        self.last_idx = Some(idx);
        Ok(())
    }

    fn end(&mut self) -> SeamResult<()> {
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| SeamError::media("ffmpeg sink not started"))?;
        self.cfg = None;
        encoder.finish()
    }
}

fn check_sink_config(cfg: &SinkConfig) -> SeamResult<()> {
    if cfg.fps.num == 0 || cfg.fps.den == 0 {
        return Err(SeamError::validation("fps must be non-zero"));
    }
    if cfg.width == 0 || cfg.height == 0 {
        return Err(SeamError::validation("ffmpeg sink needs a non-empty frame size"));
    }
    // yuv420p subsamples chroma 2x2.
    if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
        return Err(SeamError::validation(format!(
            "ffmpeg sink frame size must be even, got {}x{}",
            cfg.width, cfg.height
        )));
    }
    if let Some(bitrate) = cfg.bitrate.as_deref() {
        validate_bitrate(bitrate)?;
    }
    Ok(())
}

/// Command line for reading raw RGBA from stdin and writing `opts.out_path`.
fn encoder_args(opts: &FfmpegSinkOpts, cfg: &SinkConfig) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();
    let mut push = |a: &str| args.push(a.into());
    push(if opts.overwrite { "-y" } else { "-n" });
    for a in ["-v", "error", "-f", "rawvideo", "-pix_fmt", "rgba"] {
        push(a);
    }
    push("-s");
    push(&format!("{}x{}", cfg.width, cfg.height));
    push("-r");
    push(&format!("{}/{}", cfg.fps.num, cfg.fps.den));
    for a in ["-i", "pipe:0", "-an", "-c:v", "libx264", "-pix_fmt", "yuv420p"] {
        push(a);
    }
    if let Some(bitrate) = cfg.bitrate.as_deref() {
        push("-b:v");
        push(bitrate);
    }
    push("-movflags");
    push("+faststart");
    args.push(opts.out_path.clone().into_os_string());
    args
}

/// Accept ffmpeg bitrate notation: a positive number with an optional `k`/`K`/`M`/`G` suffix.
fn validate_bitrate(bitrate: &str) -> SeamResult<()> {
    let number = bitrate
        .strip_suffix(['k', 'K', 'M', 'G'])
        .unwrap_or(bitrate);
    if number.parse::<f64>().is_ok_and(|v| v.is_finite() && v > 0.0) {
        return Ok(());
    }
    Err(SeamError::validation(format!(
        "invalid bitrate '{bitrate}' (expected e.g. 8M or 2500k)"
    )))
}

/// Composite straight-alpha `src` over `bg` into opaque `dst`. Buffers have equal length.
fn flatten_onto(bg: Rgba8, src: &[u8], dst: &mut [u8]) {
    let bg = [bg.r, bg.g, bg.b].map(u16::from);
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        for c in 0..3 {
            let v = mul_div255_u16(u16::from(s[c]), a) + mul_div255_u16(bg[c], 255 - a);
            d[c] = v.min(255) as u8;
        }
        d[3] = 255;
    }
}

/// Create the parent directory of `path` when it is missing.
pub fn ensure_parent_dir(path: &Path) -> SeamResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
