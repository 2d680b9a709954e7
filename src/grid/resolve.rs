use crate::foundation::core::Axis;
use crate::foundation::error::{SeamError, SeamResult};
use crate::foundation::math::scaled_px_at_least;
use crate::grid::gutter::GutterRegion;
use crate::grid::options::ResolverConfig;

/// Pixel rectangle of one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CellBoundary {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels (>= 1).
    pub width: u32,
    /// Height in pixels (>= 1).
    pub height: u32,
}

/// Half-open pixel interval `[start, start + len)` along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Span {
    /// First pixel.
    pub start: u32,
    /// Length in pixels (>= 1).
    pub len: u32,
}

impl Span {
    /// One past the last pixel.
    pub fn end(self) -> u32 {
        self.start + self.len
    }
}

/// A chosen divider: either a detected gutter or a position filled in for a missing one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Divider {
    /// Pixel extent of the divider.
    pub region: GutterRegion,
    /// `true` when no gutter was detected here and the position was interpolated.
    pub synthetic: bool,
}

/// Resolution of one axis into `expected` spans.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct AxisLayout {
    /// Axis this layout belongs to.
    pub axis: Axis,
    /// First usable content pixel (after the leading margin).
    pub content_start: u32,
    /// One past the last usable content pixel (before the trailing margin).
    pub content_end: u32,
    /// Regions passed in, margins included.
    pub regions_found: usize,
    /// Regions that were neither leading nor trailing margins.
    pub internal_regions: usize,
    /// `expected - 1`.
    pub expected_dividers: u32,
    /// Chosen dividers, sorted by position.
    pub dividers: Vec<Divider>,
    /// Safety margin kept on each side of every divider and content edge.
    pub margin: u32,
    /// Cell spans, in order. Always `expected` entries.
    pub spans: Vec<Span>,
}

impl AxisLayout {
    /// Fewer internal gutters than needed were detected.
    pub fn is_shortfall(&self) -> bool {
        self.detected_dividers() < self.expected_dividers as usize
    }

    /// More internal gutters than needed were detected.
    pub fn is_excess(&self) -> bool {
        self.internal_regions > self.expected_dividers as usize
    }

    /// Number of chosen dividers that come from detected gutters.
    pub fn detected_dividers(&self) -> usize {
        self.dividers.iter().filter(|d| !d.synthetic).count()
    }

    /// Heuristic quality score in `[0, 1]`: share of detected dividers times span regularity.
    pub fn confidence(&self) -> f64 {
        let detected = if self.expected_dividers == 0 {
            1.0
        } else {
            self.detected_dividers() as f64 / f64::from(self.expected_dividers)
        };
        let lens = self.spans.iter().map(|s| f64::from(s.len));
        let (min, max, sum) = lens.fold((f64::MAX, 0.0f64, 0.0), |(lo, hi, acc), l| {
            (lo.min(l), hi.max(l), acc + l)
        });
        let regularity = if self.spans.is_empty() || sum <= 0.0 {
            0.0
        } else {
            let mean = sum / self.spans.len() as f64;
            1.0 - ((max - min) / mean).min(1.0)
        };
        detected * regularity
    }
}

/// Turn one axis' gutter regions into exactly `expected` cell spans.
///
/// Steps: split margins from internal regions, pick `expected - 1` dividers (evenly spaced
/// subset on excess, interpolated fill on shortfall), derive the safety margin from the
/// average divider width, then cut spans between dividers.
pub fn resolve_axis(
    axis: Axis,
    regions: &[GutterRegion],
    expected: u32,
    extent: u32,
    cfg: &ResolverConfig,
) -> SeamResult<AxisLayout> {
    if expected == 0 {
        return Err(SeamError::validation(format!(
            "expected {axis:?} count must be >= 1"
        )));
    }
    if extent < expected {
        return Err(SeamError::detection(format!(
            "axis extent {extent}px cannot hold {expected} cells"
        )));
    }

    let edge_zone = f64::from(extent) * cfg.edge_fraction;
    let mut content_start = 0u32;
    let mut content_end = extent;
    let mut margins = Vec::new();
    let mut internal = Vec::new();
    for r in regions.iter().copied().filter(|r| r.end < extent) {
        if f64::from(r.start) <= edge_zone {
            content_start = content_start.max(r.end + 1);
            margins.push(r);
        } else if f64::from(r.end + 1) >= f64::from(extent) - edge_zone {
            content_end = content_end.min(r.start);
            margins.push(r);
        } else {
            internal.push(r);
        }
    }
    if content_end <= content_start || content_end - content_start < expected {
        // The whole axis looked uniform; fall back to the full extent.
        content_start = 0;
        content_end = extent;
        internal.clear();
        margins.clear();
    }
    internal.retain(|r| r.start >= content_start && r.end < content_end);
    internal.sort_by_key(|r| r.start);

    let expected_dividers = expected - 1;
    let span = f64::from(content_end - content_start);
    let ideal_spacing = span / f64::from(expected);

    let dividers = if internal.len() > expected_dividers as usize {
        select_evenly_spaced(&internal, expected_dividers, content_start, ideal_spacing, cfg)
    } else if internal.len() < expected_dividers as usize {
        fill_shortfall(&internal, expected_dividers, content_start, ideal_spacing)
    } else {
        internal
            .iter()
            .map(|&region| Divider {
                region,
                synthetic: false,
            })
            .collect()
    };

    let margin = safety_margin(&dividers, &margins, cfg);
    let spans = cut_spans(&dividers, content_start, content_end, margin);

    Ok(AxisLayout {
        axis,
        content_start,
        content_end,
        regions_found: regions.len(),
        internal_regions: internal.len(),
        expected_dividers,
        dividers,
        margin,
        spans,
    })
}

fn select_evenly_spaced(
    internal: &[GutterRegion],
    count: u32,
    content_start: u32,
    ideal_spacing: f64,
    cfg: &ResolverConfig,
) -> Vec<Divider> {
    let min_gap = ideal_spacing * cfg.min_spacing_fraction;
    let mut kept = Vec::with_capacity(count as usize);
    let mut last = f64::from(content_start);
    for r in internal {
        if kept.len() == count as usize {
            break;
        }
        let c = f64::from(r.center);
        if c - last >= min_gap {
            kept.push(*r);
            last = c;
        }
    }
    if kept.len() < count as usize {
        kept = internal.iter().take(count as usize).copied().collect();
    }
    kept.into_iter()
        .map(|region| Divider {
            region,
            synthetic: false,
        })
        .collect()
}

/// Match detected gutters to ideal divider slots and interpolate the rest.
///
/// Slot `k` sits at `content_start + k * ideal_spacing`; the nearest detected gutter within
/// half a spacing claims it, otherwise a synthetic divider is placed on the slot. Synthetic
/// dividers take the average detected width (1px when nothing was detected).
fn fill_shortfall(
    internal: &[GutterRegion],
    count: u32,
    content_start: u32,
    ideal_spacing: f64,
) -> Vec<Divider> {
    let synthetic_width = if internal.is_empty() {
        1
    } else {
        let sum: u64 = internal.iter().map(|r| u64::from(r.width)).sum();
        ((sum as f64 / internal.len() as f64).round() as u32).max(1)
    };

    let mut used = vec![false; internal.len()];
    let mut out = Vec::with_capacity(count as usize);
    for k in 1..=count {
        let slot = f64::from(content_start) + f64::from(k) * ideal_spacing;
        let nearest = internal
            .iter()
            .enumerate()
            .filter(|(i, _)| !used[*i])
            .map(|(i, r)| (i, (f64::from(r.center) - slot).abs()))
            .filter(|&(_, d)| d <= ideal_spacing * 0.5)
            .min_by(|a, b| a.1.total_cmp(&b.1));
        match nearest {
            Some((i, _)) => {
                used[i] = true;
                out.push(Divider {
                    region: internal[i],
                    synthetic: false,
                });
            }
            None => {
                let center = slot.round() as u32;
                let start = center.saturating_sub(synthetic_width / 2);
                out.push(Divider {
                    region: GutterRegion::new(start, start + synthetic_width - 1),
                    synthetic: true,
                });
            }
        }
    }
    out.sort_by_key(|d| d.region.start);
    out
}

fn safety_margin(dividers: &[Divider], margins: &[GutterRegion], cfg: &ResolverConfig) -> u32 {
    let detected: Vec<u32> = dividers
        .iter()
        .filter(|d| !d.synthetic)
        .map(|d| d.region.width)
        .collect();
    let widths: Vec<u32> = if detected.is_empty() {
        margins.iter().map(|r| r.width).collect()
    } else {
        detected
    };
    let avg = if widths.is_empty() {
        0.0
    } else {
        widths.iter().map(|&w| f64::from(w)).sum::<f64>() / widths.len() as f64
    };
    scaled_px_at_least(avg, cfg.margin_factor, cfg.margin_floor_px)
}

fn cut_spans(dividers: &[Divider], content_start: u32, content_end: u32, margin: u32) -> Vec<Span> {
    let mut spans = Vec::with_capacity(dividers.len() + 1);
    let mut lo = content_start;
    for d in dividers {
        spans.push(inset(lo, d.region.start, margin, content_start, content_end));
        lo = d.region.end + 1;
    }
    spans.push(inset(lo, content_end, margin, content_start, content_end));
    spans
}

/// Shrink `[lo, hi)` by `margin` on both sides, keeping at least one pixel inside
/// `[bound_start, bound_end)`.
fn inset(lo: u32, hi: u32, margin: u32, bound_start: u32, bound_end: u32) -> Span {
    let start = lo.saturating_add(margin);
    let end = hi.min(bound_end).saturating_sub(margin);
    if end > start {
        return Span {
            start,
            len: end - start,
        };
    }
    let mid = if hi > lo { lo + (hi - lo) / 2 } else { lo };
    Span {
        start: mid.clamp(bound_start, bound_end - 1),
        len: 1,
    }
}

/// Cross product of row and column spans, row-major.
pub fn cells_from_layouts(rows: &AxisLayout, cols: &AxisLayout) -> Vec<CellBoundary> {
    let mut cells = Vec::with_capacity(rows.spans.len() * cols.spans.len());
    for r in &rows.spans {
        for c in &cols.spans {
            cells.push(CellBoundary {
                x: c.start,
                y: r.start,
                width: c.len,
                height: r.len,
            });
        }
    }
    cells
}

#[cfg(test)]
#[path = "../../tests/unit/grid/resolve.rs"]
mod tests;
