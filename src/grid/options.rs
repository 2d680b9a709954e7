use crate::foundation::core::Rgba8;
use crate::foundation::error::{SeamError, SeamResult};

/// Perpendicular sampling positions used by the variance profiler, as fractions of the
/// perpendicular extent. Defaults sample 10%, 15%, ..., 90% (17 lines).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ProfileSampling {
    /// First sampled fraction.
    pub start: f64,
    /// Last sampled fraction (inclusive).
    pub end: f64,
    /// Step between sampled fractions.
    pub step: f64,
}

impl Default for ProfileSampling {
    fn default() -> Self {
        Self {
            start: 0.10,
            end: 0.90,
            step: 0.05,
        }
    }
}

impl ProfileSampling {
    /// Reject ranges outside `[0, 1]` and non-positive steps.
    pub fn validate(&self) -> SeamResult<()> {
        let in_unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if !in_unit(self.start) || !in_unit(self.end) || self.start > self.end {
            return Err(SeamError::validation(
                "profile sampling start/end must satisfy 0 <= start <= end <= 1",
            ));
        }
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(SeamError::validation("profile sampling step must be > 0"));
        }
        Ok(())
    }

    /// The sampled fractions in increasing order.
    pub fn fractions(&self) -> SeamResult<Vec<f64>> {
        self.validate()?;
        let mut out = Vec::new();
        let mut k = 0u32;
        loop {
            let f = self.start + f64::from(k) * self.step;
            if f > self.end + 1e-9 {
                break;
            }
            out.push(f.min(1.0));
            k += 1;
        }
        Ok(out)
    }
}

/// Percentile-anchored threshold parameters.
///
/// The defaults (1st percentile, x10, clamped to `[50, 300]` in 8-bit variance units) are
/// empirical and should be recalibrated against a broader image corpus.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Percentile (as a fraction) taken as the "truly uniform" estimate.
    pub percentile: f64,
    /// Multiplier applied to the percentile value.
    pub multiplier: f64,
    /// Lower clamp for the threshold.
    pub lower_bound: f64,
    /// Upper clamp for the threshold.
    pub upper_bound: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            percentile: 0.01,
            multiplier: 10.0,
            lower_bound: 50.0,
            upper_bound: 300.0,
        }
    }
}

impl ThresholdConfig {
    /// Defaults for full-line variance profiles used by the projection strategy.
    ///
    /// The lower percentile keeps the anchor on gutter lines when they cover only 1% of the
    /// extent; the lower bound sits well under the variance a thin gutter adds to a solid line.
    pub fn projection_default() -> Self {
        Self {
            percentile: 0.005,
            multiplier: 10.0,
            lower_bound: 10.0,
            upper_bound: 300.0,
        }
    }

    /// Reject non-finite values and inverted bounds.
    pub fn validate(&self) -> SeamResult<()> {
        if !(0.0..=1.0).contains(&self.percentile) {
            return Err(SeamError::validation("threshold percentile must be in [0, 1]"));
        }
        if !self.multiplier.is_finite() || self.multiplier < 0.0 {
            return Err(SeamError::validation("threshold multiplier must be >= 0"));
        }
        if !self.lower_bound.is_finite()
            || !self.upper_bound.is_finite()
            || self.lower_bound > self.upper_bound
        {
            return Err(SeamError::validation(
                "threshold bounds must be finite with lower_bound <= upper_bound",
            ));
        }
        Ok(())
    }
}

/// Minimum gutter width policy: `max(floor_px, round(expected_cell_extent * factor))`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GutterConfig {
    /// Fraction of the expected cell extent.
    pub min_width_factor: f64,
    /// Absolute minimum in pixels.
    pub min_width_floor_px: u32,
}

impl Default for GutterConfig {
    fn default() -> Self {
        Self {
            min_width_factor: 0.01,
            min_width_floor_px: 3,
        }
    }
}

/// Divider selection and safety-margin policy.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Regions starting this close (fraction of extent) to an edge are image margins.
    pub edge_fraction: f64,
    /// Minimum distance between kept dividers, as a fraction of the ideal spacing.
    pub min_spacing_fraction: f64,
    /// Safety margin as a fraction of the average divider width.
    pub margin_factor: f64,
    /// Absolute minimum safety margin in pixels.
    pub margin_floor_px: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            edge_fraction: 0.05,
            min_spacing_fraction: 0.7,
            margin_factor: 0.15,
            margin_floor_px: 3,
        }
    }
}

/// Which detection strategy to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Variance, then projection, then equal division, by confidence.
    #[default]
    Auto,
    /// Perpendicular-variance gutter detection.
    Variance,
    /// Full-line variance projection profile.
    Projection,
    /// Pure arithmetic split of the full image.
    Equal,
}

impl std::str::FromStr for StrategyKind {
    type Err = SeamError;

    fn from_str(s: &str) -> SeamResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "variance" => Ok(Self::Variance),
            "projection" => Ok(Self::Projection),
            "equal" => Ok(Self::Equal),
            other => Err(SeamError::validation(format!(
                "unknown grid strategy '{other}' (expected auto, variance, projection or equal)"
            ))),
        }
    }
}

/// All knobs of the grid decomposition pipeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GridOptions {
    /// Strategy selection.
    pub strategy: StrategyKind,
    /// Variance profiler sampling.
    pub sampling: ProfileSampling,
    /// Threshold for variance profiles.
    pub threshold: ThresholdConfig,
    /// Threshold for projection profiles.
    pub projection_threshold: ThresholdConfig,
    /// Minimum gutter width policy.
    pub gutter: GutterConfig,
    /// Divider selection and margins.
    pub resolver: ResolverConfig,
    /// Confidence below which the auto strategy falls back to the next strategy.
    pub min_confidence: f64,
    /// Letterbox fill colour used when normalizing cells.
    pub fill: Rgba8,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Auto,
            sampling: ProfileSampling::default(),
            threshold: ThresholdConfig::default(),
            projection_threshold: ThresholdConfig::projection_default(),
            gutter: GutterConfig::default(),
            resolver: ResolverConfig::default(),
            min_confidence: 0.6,
            fill: Rgba8::BLACK,
        }
    }
}

impl GridOptions {
    /// Validate every nested option group.
    pub fn validate(&self) -> SeamResult<()> {
        self.sampling.validate()?;
        self.threshold.validate()?;
        self.projection_threshold.validate()?;
        if !self.gutter.min_width_factor.is_finite() || self.gutter.min_width_factor < 0.0 {
            return Err(SeamError::validation("gutter min_width_factor must be >= 0"));
        }
        let r = &self.resolver;
        if !(0.0..0.5).contains(&r.edge_fraction) {
            return Err(SeamError::validation("resolver edge_fraction must be in [0, 0.5)"));
        }
        if !r.min_spacing_fraction.is_finite() || r.min_spacing_fraction < 0.0 {
            return Err(SeamError::validation(
                "resolver min_spacing_fraction must be >= 0",
            ));
        }
        if !r.margin_factor.is_finite() || r.margin_factor < 0.0 {
            return Err(SeamError::validation("resolver margin_factor must be >= 0"));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(SeamError::validation("min_confidence must be in [0, 1]"));
        }
        Ok(())
    }
}
