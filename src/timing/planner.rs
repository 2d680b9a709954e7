use crate::foundation::core::{Fps, FrameIndex, FrameRange};
use crate::foundation::error::{SeamError, SeamResult};
use crate::timing::ease::Ease;
use crate::timing::mapper::{MapperOptions, TimestampPlan, map_timestamps_with};

/// One output frame of a concatenated timeline.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GlobalFrame {
    /// Position in the concatenated output.
    pub index: FrameIndex,
    /// Segment this frame samples from.
    pub segment: usize,
    /// Index within the segment's own plan.
    pub local_index: u64,
    /// Source time within the segment's clip, in seconds.
    pub source_time: f64,
}

/// Output frames owned by one segment.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SegmentSpan {
    /// Segment number.
    pub segment: usize,
    /// Global frames `[start, end)` belonging to the segment.
    pub range: FrameRange,
}

/// Timestamp plan of several retimed segments laid end to end.
///
/// Global indices run `0..len()` with no gaps or overlaps; segment `k`'s frames directly
/// follow segment `k - 1`'s.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GlobalTimestampPlan {
    /// Output frame rate shared by every segment.
    pub fps: Fps,
    /// Every output frame in global order.
    pub frames: Vec<GlobalFrame>,
    /// Per-segment global ranges, in segment order.
    pub segments: Vec<SegmentSpan>,
    /// Per-segment local plans, in segment order.
    pub plans: Vec<TimestampPlan>,
}

impl GlobalTimestampPlan {
    /// Total output frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// `true` when every segment was shorter than one frame.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Local plan of segment `k`.
    pub fn plan_for_segment(&self, k: usize) -> Option<&TimestampPlan> {
        self.plans.get(k)
    }

    /// Global frames belonging to segment `k`.
    pub fn frames_for_segment(&self, k: usize) -> &[GlobalFrame] {
        match self.segments.get(k) {
            Some(span) => {
                let start = span.range.start.0 as usize;
                let end = span.range.end.0 as usize;
                &self.frames[start..end]
            }
            None => &[],
        }
    }

    /// Output duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.fps.frames_to_secs(self.frames.len() as u64)
    }
}

/// Retime every segment with the same curve and output duration, then number the frames
/// contiguously across segments.
pub fn plan_segments(
    ease: Ease,
    source_durations: &[f64],
    output_duration: f64,
    fps: Fps,
    opts: &MapperOptions,
) -> SeamResult<GlobalTimestampPlan> {
    if source_durations.is_empty() {
        return Err(SeamError::validation("at least one segment is required"));
    }

    let plans = source_durations
        .iter()
        .enumerate()
        .map(|(k, &d)| {
            map_timestamps_with(ease, d, output_duration, fps, opts).map_err(|e| match e {
                SeamError::Validation(msg) => SeamError::validation(format!("segment {k}: {msg}")),
                other => other,
            })
        })
        .collect::<SeamResult<Vec<_>>>()?;

    let total: usize = plans.iter().map(TimestampPlan::len).sum();
    let mut frames = Vec::with_capacity(total);
    let mut segments = Vec::with_capacity(plans.len());
    let mut cumulative = 0u64;
    for (segment, plan) in plans.iter().enumerate() {
        let start = cumulative;
        for (local, &source_time) in plan.times.iter().enumerate() {
            frames.push(GlobalFrame {
                index: FrameIndex(cumulative),
                segment,
                local_index: local as u64,
                source_time,
            });
            cumulative += 1;
        }
        segments.push(SegmentSpan {
            segment,
            range: FrameRange::new(FrameIndex(start), FrameIndex(cumulative))?,
        });
    }

    tracing::debug!(
        segments = segments.len(),
        frames = frames.len(),
        %fps,
        "planned concatenated timeline"
    );
    Ok(GlobalTimestampPlan {
        fps,
        frames,
        segments,
        plans,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/timing/planner.rs"]
mod tests;
