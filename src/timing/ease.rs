use std::f64::consts::PI;

use kurbo::{CubicBez, ParamCurve, ParamCurveDeriv};

use crate::foundation::error::{SeamError, SeamResult};

const BEZIER_TOLERANCE: f64 = 1e-6;
const NEWTON_ITERATIONS: usize = 8;
const BISECTION_ITERATIONS: usize = 64;

/// Easing functions used to map normalized playback progress.
///
/// Every variant maps `[0, 1]` onto itself with `f(0) = 0` and `f(1) = 1`. Parse one from a
/// name (`"ease-in-out-cubic"`, `"in-out-cubic"`, `"cubic-in-out"`) or from a Bézier tuple
/// (`"cubic-bezier(0.42, 0, 0.58, 1)"`).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ease {
    /// Linear interpolation.
    Linear,
    /// Quadratic ease-in.
    InQuad,
    /// Quadratic ease-out.
    OutQuad,
    /// Quadratic ease-in/out.
    InOutQuad,
    /// Cubic ease-in.
    InCubic,
    /// Cubic ease-out.
    OutCubic,
    /// Cubic ease-in/out.
    InOutCubic,
    /// Quartic ease-in.
    InQuart,
    /// Quartic ease-out.
    OutQuart,
    /// Quartic ease-in/out.
    InOutQuart,
    /// Quintic ease-in.
    InQuint,
    /// Quintic ease-out.
    OutQuint,
    /// Quintic ease-in/out.
    InOutQuint,
    /// Sinusoidal ease-in.
    InSine,
    /// Sinusoidal ease-out.
    OutSine,
    /// Sinusoidal ease-in/out.
    InOutSine,
    /// CSS-style timing curve through `(0,0)`, `(p1x,p1y)`, `(p2x,p2y)`, `(1,1)`.
    CubicBezier {
        /// First control point x, in `[0, 1]`.
        p1x: f64,
        /// First control point y.
        p1y: f64,
        /// Second control point x, in `[0, 1]`.
        p2x: f64,
        /// Second control point y.
        p2y: f64,
    },
}

impl Ease {
    /// Every named entry, in catalog order.
    pub const CATALOG: [Ease; 16] = [
        Self::Linear,
        Self::InQuad,
        Self::OutQuad,
        Self::InOutQuad,
        Self::InCubic,
        Self::OutCubic,
        Self::InOutCubic,
        Self::InQuart,
        Self::OutQuart,
        Self::InOutQuart,
        Self::InQuint,
        Self::OutQuint,
        Self::InOutQuint,
        Self::InSine,
        Self::OutSine,
        Self::InOutSine,
    ];

    /// CSS `ease`.
    pub const CSS_EASE: Ease = Self::CubicBezier {
        p1x: 0.25,
        p1y: 0.1,
        p2x: 0.25,
        p2y: 1.0,
    };
    /// CSS `ease-in`.
    pub const CSS_EASE_IN: Ease = Self::CubicBezier {
        p1x: 0.42,
        p1y: 0.0,
        p2x: 1.0,
        p2y: 1.0,
    };
    /// CSS `ease-out`.
    pub const CSS_EASE_OUT: Ease = Self::CubicBezier {
        p1x: 0.0,
        p1y: 0.0,
        p2x: 0.58,
        p2y: 1.0,
    };
    /// CSS `ease-in-out`.
    pub const CSS_EASE_IN_OUT: Ease = Self::CubicBezier {
        p1x: 0.42,
        p1y: 0.0,
        p2x: 0.58,
        p2y: 1.0,
    };

    /// Validated cubic-Bézier easing.
    pub fn cubic_bezier(p1x: f64, p1y: f64, p2x: f64, p2y: f64) -> SeamResult<Self> {
        let ease = Self::CubicBezier { p1x, p1y, p2x, p2y };
        ease.validate()?;
        Ok(ease)
    }

    /// Reject Bézier control points that are not finite or whose x lies outside `[0, 1]`.
    pub fn validate(&self) -> SeamResult<()> {
        let Self::CubicBezier { p1x, p1y, p2x, p2y } = *self else {
            return Ok(());
        };
        if ![p1x, p1y, p2x, p2y].iter().all(|v| v.is_finite()) {
            return Err(SeamError::validation(
                "cubic-bezier control points must be finite",
            ));
        }
        if !(0.0..=1.0).contains(&p1x) || !(0.0..=1.0).contains(&p2x) {
            return Err(SeamError::validation(format!(
                "cubic-bezier x control points must be in [0, 1], got p1x={p1x}, p2x={p2x}"
            )));
        }
        Ok(())
    }

    /// Apply this easing function to normalized progress `t`, clamped to `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => in_out(t, 2),
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => in_out(t, 3),
            Self::InQuart => t.powi(4),
            Self::OutQuart => 1.0 - (1.0 - t).powi(4),
            Self::InOutQuart => in_out(t, 4),
            Self::InQuint => t.powi(5),
            Self::OutQuint => 1.0 - (1.0 - t).powi(5),
            Self::InOutQuint => in_out(t, 5),
            Self::InSine => 1.0 - (t * PI / 2.0).cos(),
            Self::OutSine => (t * PI / 2.0).sin(),
            Self::InOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Self::CubicBezier { p1x, p1y, p2x, p2y } => bezier_y_for_x(p1x, p1y, p2x, p2y, t),
        }
    }

    /// `true` for the identity curve.
    pub fn is_linear(self) -> bool {
        matches!(self, Self::Linear)
    }
}

/// Symmetric polynomial ease-in/out of degree `n`.
fn in_out(t: f64, n: i32) -> f64 {
    if t < 0.5 {
        2f64.powi(n - 1) * t.powi(n)
    } else {
        1.0 - (-2.0 * t + 2.0).powi(n) / 2.0
    }
}

/// Solve `x(s) = x` on the curve, then return `y(s)`.
fn bezier_y_for_x(p1x: f64, p1y: f64, p2x: f64, p2y: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let curve = CubicBez::new((0.0, 0.0), (p1x, p1y), (p2x, p2y), (1.0, 1.0));
    let dcurve = curve.deriv();

    let mut s = x;
    for _ in 0..NEWTON_ITERATIONS {
        let err = curve.eval(s).x - x;
        if err.abs() < BEZIER_TOLERANCE {
            return curve.eval(s).y;
        }
        let slope = dcurve.eval(s).x;
        if slope.abs() < 1e-9 {
            break;
        }
        s = (s - err / slope).clamp(0.0, 1.0);
    }

    // x(s) is monotonic for p1x, p2x in [0, 1].
    let (mut lo, mut hi) = (0.0, 1.0);
    s = x;
    for _ in 0..BISECTION_ITERATIONS {
        let px = curve.eval(s).x;
        if (px - x).abs() < BEZIER_TOLERANCE {
            break;
        }
        if px < x {
            lo = s;
        } else {
            hi = s;
        }
        s = 0.5 * (lo + hi);
    }
    curve.eval(s).y
}

impl std::fmt::Display for Ease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Linear => "linear",
            Self::InQuad => "ease-in-quad",
            Self::OutQuad => "ease-out-quad",
            Self::InOutQuad => "ease-in-out-quad",
            Self::InCubic => "ease-in-cubic",
            Self::OutCubic => "ease-out-cubic",
            Self::InOutCubic => "ease-in-out-cubic",
            Self::InQuart => "ease-in-quart",
            Self::OutQuart => "ease-out-quart",
            Self::InOutQuart => "ease-in-out-quart",
            Self::InQuint => "ease-in-quint",
            Self::OutQuint => "ease-out-quint",
            Self::InOutQuint => "ease-in-out-quint",
            Self::InSine => "ease-in-sine",
            Self::OutSine => "ease-out-sine",
            Self::InOutSine => "ease-in-out-sine",
            Self::CubicBezier { p1x, p1y, p2x, p2y } => {
                return write!(f, "cubic-bezier({p1x}, {p1y}, {p2x}, {p2y})");
            }
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Ease {
    type Err = SeamError;

    fn from_str(s: &str) -> SeamResult<Self> {
        let raw = s.trim().to_ascii_lowercase();
        if let Some(inner) = raw
            .strip_prefix("cubic-bezier")
            .map(str::trim_start)
            .and_then(|r| r.strip_prefix('('))
        {
            let inner = inner.strip_suffix(')').ok_or_else(|| {
                SeamError::validation(format!("malformed cubic-bezier '{s}': missing ')'"))
            })?;
            return parse_bezier_tuple(inner, s);
        }
        if raw.contains(',') {
            return parse_bezier_tuple(&raw, s);
        }

        let compact: String = raw
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect();
        match compact.as_str() {
            "linear" => return Ok(Self::Linear),
            "ease" => return Ok(Self::CSS_EASE),
            "easein" => return Ok(Self::CSS_EASE_IN),
            "easeout" => return Ok(Self::CSS_EASE_OUT),
            "easeinout" => return Ok(Self::CSS_EASE_IN_OUT),
            _ => {}
        }
        Self::CATALOG
            .into_iter()
            .find(|e| catalog_aliases(*e).iter().any(|a| *a == compact))
            .ok_or_else(|| SeamError::validation(format!("unknown easing '{s}'")))
    }
}

/// Compact spellings accepted for a named entry: `easeinquad`, `inquad`, `quadin`.
fn catalog_aliases(ease: Ease) -> Vec<String> {
    let (dir, family) = match ease {
        Ease::Linear | Ease::CubicBezier { .. } => return vec!["linear".to_owned()],
        Ease::InQuad => ("in", "quad"),
        Ease::OutQuad => ("out", "quad"),
        Ease::InOutQuad => ("inout", "quad"),
        Ease::InCubic => ("in", "cubic"),
        Ease::OutCubic => ("out", "cubic"),
        Ease::InOutCubic => ("inout", "cubic"),
        Ease::InQuart => ("in", "quart"),
        Ease::OutQuart => ("out", "quart"),
        Ease::InOutQuart => ("inout", "quart"),
        Ease::InQuint => ("in", "quint"),
        Ease::OutQuint => ("out", "quint"),
        Ease::InOutQuint => ("inout", "quint"),
        Ease::InSine => ("in", "sine"),
        Ease::OutSine => ("out", "sine"),
        Ease::InOutSine => ("inout", "sine"),
    };
    vec![
        format!("ease{dir}{family}"),
        format!("{dir}{family}"),
        format!("{family}{dir}"),
    ]
}

fn parse_bezier_tuple(inner: &str, original: &str) -> SeamResult<Ease> {
    let nums = inner
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| {
            SeamError::validation(format!(
                "malformed cubic-bezier '{original}': expected four numbers"
            ))
        })?;
    match nums.as_slice() {
        [a, b, c, d] => Ease::cubic_bezier(*a, *b, *c, *d),
        _ => Err(SeamError::validation(format!(
            "malformed cubic-bezier '{original}': expected four numbers, got {}",
            nums.len()
        ))),
    }
}

impl TryFrom<String> for Ease {
    type Error = SeamError;

    fn try_from(s: String) -> SeamResult<Self> {
        s.parse()
    }
}

impl From<Ease> for String {
    fn from(e: Ease) -> Self {
        e.to_string()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timing/ease.rs"]
mod tests;
