//! Retime pipeline: extract every planned source instant and stream it into a sink.
//!
//! Frames are decoded chunk by chunk on a dedicated `rayon` pool; each chunk is collected
//! in plan order before it reaches the sink, so the sink always sees strictly increasing
//! indices.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::Fps;
use crate::foundation::error::{SeamError, SeamResult};
use crate::media::frame::FrameRGBA;
use crate::media::{VideoBackend, VideoSourceInfo};
use crate::timing::ease::Ease;
use crate::timing::mapper::MapperOptions;
use crate::timing::planner::{GlobalFrame, GlobalTimestampPlan, plan_segments};

/// Extraction parallelism.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RetimeThreading {
    /// Decode on a thread pool; sequential when `false`.
    pub parallel: bool,
    /// Frames decoded per chunk before they are handed to the sink.
    pub chunk_size: usize,
    /// Pool size; all available cores when unset.
    pub threads: Option<usize>,
}

impl Default for RetimeThreading {
    fn default() -> Self {
        Self {
            parallel: true,
            chunk_size: 64,
            threads: None,
        }
    }
}

/// Retime settings loadable from a config file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RetimeOptions {
    /// Speed curve used when none is given on the command line.
    pub easing: Ease,
    /// Timestamp mapping guard.
    pub mapper: MapperOptions,
    /// Extraction parallelism.
    pub threading: RetimeThreading,
    /// Target bitrate passed to the encoder.
    pub bitrate: Option<String>,
}

impl Default for RetimeOptions {
    fn default() -> Self {
        Self {
            easing: Ease::InOutCubic,
            mapper: MapperOptions::default(),
            threading: RetimeThreading::default(),
            bitrate: None,
        }
    }
}

/// Counters reported by [`render_plan`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RetimeStats {
    /// Frames pushed to the sink.
    pub frames: u64,
    /// Chunks processed.
    pub chunks: u64,
}

/// Decode every frame of `plan` from `sources` and push it into `sink`.
///
/// `sources[k]` is the clip of segment `k`; all clips must share one frame size. `cancel` is
/// checked before each chunk and once more before a decoded chunk is pushed; on
/// cancellation the sink is left unfinished and [`SeamError::Cancelled`] is returned.
#[tracing::instrument(skip_all, fields(frames = plan.len(), segments = sources.len()))]
pub fn render_plan(
    plan: &GlobalTimestampPlan,
    sources: &[VideoSourceInfo],
    video: &dyn VideoBackend,
    sink: &mut dyn FrameSink,
    threading: &RetimeThreading,
    bitrate: Option<String>,
    cancel: &AtomicBool,
) -> SeamResult<RetimeStats> {
    if plan.is_empty() {
        return Err(SeamError::validation(
            "retimed output has no frames (output duration shorter than one frame)",
        ));
    }
    if sources.len() != plan.segments.len() {
        return Err(SeamError::validation(format!(
            "plan has {} segments but {} sources were given",
            plan.segments.len(),
            sources.len()
        )));
    }
    let (width, height) = common_frame_size(sources)?;

    let chunk_size = normalized_chunk_size(threading.chunk_size);
    let pool = if threading.parallel {
        Some(build_thread_pool(threading.threads)?)
    } else {
        None
    };

    sink.begin(SinkConfig {
        width,
        height,
        fps: plan.fps,
        bitrate,
    })?;

    let mut stats = RetimeStats::default();
    for chunk in plan.frames.chunks(chunk_size) {
        if cancel.load(Ordering::Relaxed) {
            return Err(cancelled(&stats));
        }
        let frames = match pool.as_ref() {
            Some(pool) => extract_chunk_parallel(chunk, sources, video, pool)?,
            None => extract_chunk_sequential(chunk, sources, video)?,
        };
        if cancel.load(Ordering::Relaxed) {
            return Err(cancelled(&stats));
        }

        for (gf, frame) in chunk.iter().zip(&frames) {
            if frame.width != width || frame.height != height {
                return Err(SeamError::media(format!(
                    "segment {} decoded a {}x{} frame at {:.3}s, expected {width}x{height}",
                    gf.segment, frame.width, frame.height, gf.source_time
                )));
            }
            sink.push_frame(gf.index, frame)?;
        }
        stats.frames += chunk.len() as u64;
        stats.chunks += 1;
        tracing::trace!(done = stats.frames, total = plan.len(), "chunk delivered");
    }

    sink.end()?;
    tracing::info!(frames = stats.frames, chunks = stats.chunks, "retime complete");
    Ok(stats)
}

/// Probe `paths`, plan them as consecutive retimed segments and render into `sink`.
///
/// A single path is a plain retime; several paths are concatenated.
#[allow(clippy::too_many_arguments)]
pub fn retime_files(
    video: &dyn VideoBackend,
    paths: &[&Path],
    ease: Ease,
    output_duration: f64,
    fps: Fps,
    sink: &mut dyn FrameSink,
    opts: &RetimeOptions,
    cancel: &AtomicBool,
) -> SeamResult<(GlobalTimestampPlan, RetimeStats)> {
    if paths.is_empty() {
        return Err(SeamError::validation("at least one source video is required"));
    }
    let sources = paths
        .iter()
        .map(|p| video.probe(p))
        .collect::<SeamResult<Vec<_>>>()?;
    for s in &sources {
        tracing::debug!(
            path = %s.source_path.display(),
            duration = s.duration_sec,
            width = s.width,
            height = s.height,
            "probed source"
        );
    }
    let durations: Vec<f64> = sources.iter().map(|s| s.duration_sec).collect();
    let plan = plan_segments(ease, &durations, output_duration, fps, &opts.mapper)?;
    let stats = render_plan(
        &plan,
        &sources,
        video,
        sink,
        &opts.threading,
        opts.bitrate.clone(),
        cancel,
    )?;
    Ok((plan, stats))
}

fn extract_chunk_sequential(
    chunk: &[GlobalFrame],
    sources: &[VideoSourceInfo],
    video: &dyn VideoBackend,
) -> SeamResult<Vec<FrameRGBA>> {
    chunk
        .iter()
        .map(|gf| video.extract_frame(&sources[gf.segment], gf.source_time))
        .collect()
}

fn extract_chunk_parallel(
    chunk: &[GlobalFrame],
    sources: &[VideoSourceInfo],
    video: &dyn VideoBackend,
    pool: &rayon::ThreadPool,
) -> SeamResult<Vec<FrameRGBA>> {
    let decoded = pool.install(|| {
        chunk
            .par_iter()
            .map(|gf| video.extract_frame(&sources[gf.segment], gf.source_time))
            .collect::<Vec<_>>()
    });
    decoded.into_iter().collect()
}

fn common_frame_size(sources: &[VideoSourceInfo]) -> SeamResult<(u32, u32)> {
    let first = sources
        .first()
        .ok_or_else(|| SeamError::validation("at least one source video is required"))?;
    for s in &sources[1..] {
        if (s.width, s.height) != (first.width, first.height) {
            return Err(SeamError::validation(format!(
                "'{}' is {}x{} but '{}' is {}x{}; concatenated sources must share one frame size",
                s.source_path.display(),
                s.width,
                s.height,
                first.source_path.display(),
                first.width,
                first.height
            )));
        }
    }
    Ok((first.width, first.height))
}

fn cancelled(stats: &RetimeStats) -> SeamError {
    tracing::warn!(delivered = stats.frames, "retime cancelled");
    SeamError::Cancelled
}

fn build_thread_pool(threads: Option<usize>) -> SeamResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(SeamError::validation(
            "retime threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| SeamError::media(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> usize {
    chunk_size.max(1)
}

#[cfg(test)]
#[path = "../../tests/unit/retime/mod.rs"]
mod tests;
