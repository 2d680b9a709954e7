use crate::foundation::math::scaled_px_at_least;
use crate::grid::options::GutterConfig;
use crate::grid::profile::VarianceProfile;

/// Contiguous low-variance band along one axis, in pixel coordinates (`end` inclusive).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GutterRegion {
    /// First position of the band.
    pub start: u32,
    /// Last position of the band.
    pub end: u32,
    /// `end - start + 1`.
    pub width: u32,
    /// Midpoint, rounded down.
    pub center: u32,
}

impl GutterRegion {
    /// Build a region from inclusive bounds. `end` is raised to `start` if smaller.
    pub fn new(start: u32, end: u32) -> Self {
        let end = end.max(start);
        Self {
            start,
            end,
            width: end - start + 1,
            center: start + (end - start) / 2,
        }
    }
}

/// Axis-adaptive minimum gutter width: `max(floor, round(expected_cell_extent * factor))`.
pub fn min_gutter_width(expected_cell_extent: f64, cfg: &GutterConfig) -> u32 {
    scaled_px_at_least(
        expected_cell_extent,
        cfg.min_width_factor,
        cfg.min_width_floor_px.max(1),
    )
}

/// Scan `profile` in order and report every run of positions with `value < threshold`
/// that is at least `min_width` long. Edge margins are included.
pub fn detect_gutters(profile: &VarianceProfile, threshold: f64, min_width: u32) -> Vec<GutterRegion> {
    let min_width = min_width.max(1);
    let mut out = Vec::new();
    let mut run_start: Option<u32> = None;

    for (pos, &v) in profile.values.iter().enumerate() {
        let pos = pos as u32;
        if v < threshold {
            run_start.get_or_insert(pos);
        } else if let Some(start) = run_start.take() {
            push_run(&mut out, start, pos - 1, min_width);
        }
    }
    if let Some(start) = run_start {
        let last = profile.values.len() as u32 - 1;
        push_run(&mut out, start, last, min_width);
    }
    out
}

fn push_run(out: &mut Vec<GutterRegion>, start: u32, end: u32, min_width: u32) {
    if end - start + 1 >= min_width {
        out.push(GutterRegion::new(start, end));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/grid/gutter.rs"]
mod tests;
