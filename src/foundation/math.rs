/// Population variance of `samples` (divides by `n`, not `n - 1`). Empty input yields `0.0`.
pub(crate) fn population_variance(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    samples.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n
}

/// Nearest-rank-below percentile of already sorted values: `sorted[floor(len * q)]`,
/// clamped to the last element. `q` is a fraction in `[0, 1]`.
pub(crate) fn percentile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let q = q.clamp(0.0, 1.0);
    let idx = ((sorted.len() as f64) * q).floor() as usize;
    Some(sorted[idx.min(sorted.len() - 1)])
}

/// `round(x * y / 255)` for 8-bit channel arithmetic.
pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// `max(floor, round(value * factor))` as a pixel count.
pub(crate) fn scaled_px_at_least(value: f64, factor: f64, floor: u32) -> u32 {
    let scaled = (value * factor).round();
    if !scaled.is_finite() || scaled <= 0.0 {
        return floor;
    }
    (scaled.min(f64::from(u32::MAX)) as u32).max(floor)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
