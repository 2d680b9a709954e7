use crate::foundation::core::Fps;
use crate::foundation::error::{SeamError, SeamResult};
use crate::timing::ease::Ease;

/// Tuning for [`map_timestamps_with`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MapperOptions {
    /// Guard kept below the source duration so no sample lands past the last decodable
    /// instant.
    pub epsilon_secs: f64,
}

impl Default for MapperOptions {
    fn default() -> Self {
        Self {
            epsilon_secs: 0.001,
        }
    }
}

impl MapperOptions {
    /// Reject a non-finite or non-positive guard.
    pub fn validate(&self) -> SeamResult<()> {
        if !self.epsilon_secs.is_finite() || self.epsilon_secs <= 0.0 {
            return Err(SeamError::validation("mapper epsilon_secs must be > 0"));
        }
        Ok(())
    }
}

/// Source instants sampled for one retimed segment, one per output frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimestampPlan {
    /// Duration of the source clip in seconds.
    pub source_duration: f64,
    /// Requested output duration in seconds.
    pub output_duration: f64,
    /// Output frame rate.
    pub fps: Fps,
    /// Source time for output frame `i`, in `[0, source_duration)`.
    pub times: Vec<f64>,
}

impl TimestampPlan {
    /// Number of output frames.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// `true` when the output is shorter than one frame.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Playback speed between consecutive output frames, relative to real time.
    ///
    /// Entry `i` is `(times[i+1] - times[i]) * fps`: `1.0` plays the source at natural
    /// speed, values below 1 are slow motion.
    pub fn speed_profile(&self) -> Vec<f64> {
        let fps = self.fps.as_f64();
        self.times.windows(2).map(|w| (w[1] - w[0]) * fps).collect()
    }
}

/// Output frames produced for `output_duration` seconds at `fps`: `floor(duration * fps)`.
pub fn frame_count(output_duration: f64, fps: Fps) -> u64 {
    fps.secs_to_frames_floor(output_duration)
}

/// [`map_timestamps_with`] using default options.
pub fn map_timestamps(
    ease: Ease,
    source_duration: f64,
    output_duration: f64,
    fps: Fps,
) -> SeamResult<TimestampPlan> {
    map_timestamps_with(
        ease,
        source_duration,
        output_duration,
        fps,
        &MapperOptions::default(),
    )
}

/// Compute which source instant each output frame of a retimed segment samples.
///
/// Output frame `i` of `N` gets progress `i / (N - 1)`; its source time is
/// `ease(progress) * source_duration`, clamped to `[0, source_duration - epsilon]`. A linear
/// curve with equal durations plays the source 1:1 and samples at `i / fps`.
pub fn map_timestamps_with(
    ease: Ease,
    source_duration: f64,
    output_duration: f64,
    fps: Fps,
    opts: &MapperOptions,
) -> SeamResult<TimestampPlan> {
    validate_duration("source", source_duration)?;
    validate_duration("output", output_duration)?;
    if fps.num == 0 || fps.den == 0 {
        return Err(SeamError::validation("fps must be non-zero"));
    }
    ease.validate()?;
    opts.validate()?;

    let n = frame_count(output_duration, fps);
    let upper = (source_duration - opts.epsilon_secs).max(0.0);
    let clamp = |t: f64| t.clamp(0.0, upper);

    let identity = ease.is_linear() && source_duration == output_duration;
    let times: Vec<f64> = if identity {
        (0..n).map(|i| clamp(fps.frames_to_secs(i))).collect()
    } else if n <= 1 {
        (0..n).map(|_| clamp(ease.apply(0.0) * source_duration)).collect()
    } else {
        let last = (n - 1) as f64;
        (0..n)
            .map(|i| clamp(ease.apply(i as f64 / last) * source_duration))
            .collect()
    };

    if times.is_empty() {
        tracing::warn!(output_duration, %fps, "output duration is shorter than one frame");
    }
    tracing::debug!(
        %ease,
        source_duration,
        output_duration,
        %fps,
        frames = n,
        identity,
        "mapped timestamps"
    );

    Ok(TimestampPlan {
        source_duration,
        output_duration,
        fps,
        times,
    })
}

fn validate_duration(what: &str, secs: f64) -> SeamResult<()> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(SeamError::validation(format!(
            "{what} duration must be a positive number of seconds, got {secs}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/timing/mapper.rs"]
mod tests;
