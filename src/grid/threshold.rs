use crate::foundation::math::percentile_sorted;
use crate::grid::options::ThresholdConfig;
use crate::grid::profile::VarianceProfile;

/// Cutoff separating gutter positions (below) from content positions.
///
/// The low percentile of the profile estimates what "truly uniform" looks like in this image
/// (gutter colour and grain), so the threshold adapts without a global magic number. Empty
/// profiles get the lower bound.
pub fn adaptive_threshold(profile: &VarianceProfile, cfg: &ThresholdConfig) -> f64 {
    let mut sorted: Vec<f64> = profile
        .values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .collect();
    sorted.sort_by(f64::total_cmp);

    let Some(p) = percentile_sorted(&sorted, cfg.percentile) else {
        return cfg.lower_bound;
    };
    (p * cfg.multiplier).clamp(cfg.lower_bound, cfg.upper_bound)
}

#[cfg(test)]
#[path = "../../tests/unit/grid/threshold.rs"]
mod tests;
