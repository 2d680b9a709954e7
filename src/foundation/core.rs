use std::str::FromStr;

use crate::foundation::error::{SeamError, SeamResult};

/// Output frame index (0-based).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Half-open frame range `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    /// First frame in the range.
    pub start: FrameIndex,
    /// One past the last frame in the range.
    pub end: FrameIndex, // exclusive
}

impl FrameRange {
    /// Build a range, rejecting `start > end`.
    pub fn new(start: FrameIndex, end: FrameIndex) -> SeamResult<Self> {
        if start.0 > end.0 {
            return Err(SeamError::validation("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    /// Number of frames in the range.
    pub fn len_frames(self) -> u64 {
        self.end.0.saturating_sub(self.start.0)
    }

    /// `true` when the range holds no frames.
    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }

    /// `true` when `f` lies inside the range.
    pub fn contains(self, f: FrameIndex) -> bool {
        self.start.0 <= f.0 && f.0 < self.end.0
    }
}

/// Rational frames-per-second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator.
    pub num: u32,
    /// Denominator.
    pub den: u32, // must be > 0
}

impl Fps {
    /// Build a frame rate, rejecting zero numerator or denominator.
    pub fn new(num: u32, den: u32) -> SeamResult<Self> {
        if den == 0 {
            return Err(SeamError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(SeamError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Frames per second as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Start time of frame number `frames`.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    /// Whole frames that fit in `secs`.
    pub fn secs_to_frames_floor(self, secs: f64) -> u64 {
        // Tiny bias absorbs float error like 68.99999999999999 for 2.3s @ 30fps.
        let scaled = secs * f64::from(self.num);
        let frames = (scaled / f64::from(self.den) + 1e-9).floor();
        frames.max(0.0) as u64
    }
}

impl std::fmt::Display for Fps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

impl FromStr for Fps {
    type Err = SeamError;

    /// Accepts `30`, `30000/1001` or a decimal such as `29.97` (kept to 1/1000 precision).
    fn from_str(s: &str) -> SeamResult<Self> {
        let s = s.trim();
        if let Some((num, den)) = s.split_once('/') {
            let num = num
                .trim()
                .parse::<u32>()
                .map_err(|_| SeamError::validation(format!("invalid fps numerator in '{s}'")))?;
            let den = den
                .trim()
                .parse::<u32>()
                .map_err(|_| SeamError::validation(format!("invalid fps denominator in '{s}'")))?;
            return Self::new(num, den);
        }
        if let Ok(whole) = s.parse::<u32>() {
            return Self::new(whole, 1);
        }
        let v = s
            .parse::<f64>()
            .map_err(|_| SeamError::validation(format!("invalid fps '{s}'")))?;
        if !v.is_finite() || v <= 0.0 {
            return Err(SeamError::validation(format!("fps must be positive, got '{s}'")));
        }
        let num = (v * 1000.0).round();
        if num < 1.0 || num > f64::from(u32::MAX) {
            return Err(SeamError::validation(format!("fps out of range: '{s}'")));
        }
        Self::new(num as u32, 1000)
    }
}

/// Image axis along which a profile or gutter list is measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Positions are x coordinates; gutters found here are vertical dividers (columns).
    Columns,
    /// Positions are y coordinates; gutters found here are horizontal dividers (rows).
    Rows,
}

impl Axis {
    /// Extent of an image of `width × height` along this axis.
    pub fn extent(self, width: u32, height: u32) -> u32 {
        match self {
            Self::Columns => width,
            Self::Rows => height,
        }
    }

    /// Extent of an image of `width × height` across this axis.
    pub fn perpendicular_extent(self, width: u32, height: u32) -> u32 {
        match self {
            Self::Columns => height,
            Self::Rows => width,
        }
    }
}

/// Straight-alpha RGBA8 colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque black.
    pub const BLACK: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };

    /// Build a colour from components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Components as an array.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Rgba8 {
    fn default() -> Self {
        Self::BLACK
    }
}

impl FromStr for Rgba8 {
    type Err = SeamError;

    /// Accepts `r,g,b` or `r,g,b,a` with components in `0..=255`.
    fn from_str(s: &str) -> SeamResult<Self> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<u8>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| SeamError::validation(format!("invalid colour '{s}'")))?;
        match parts.as_slice() {
            [r, g, b] => Ok(Self::new(*r, *g, *b, 255)),
            [r, g, b, a] => Ok(Self::new(*r, *g, *b, *a)),
            _ => Err(SeamError::validation(format!(
                "colour must have 3 or 4 components, got '{s}'"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
