use super::*;
use crate::foundation::core::Axis;

fn profile(values: Vec<f64>) -> VarianceProfile {
    VarianceProfile {
        axis: Axis::Rows,
        values,
    }
}

fn bands(runs: &[(usize, f64)]) -> Vec<f64> {
    runs.iter()
        .flat_map(|&(n, v)| std::iter::repeat_n(v, n))
        .collect()
}

#[test]
fn region_fields_are_consistent() {
    let r = GutterRegion::new(10, 29);
    assert_eq!(r.width, 20);
    assert_eq!(r.center, 19);
}

#[test]
fn finds_internal_and_edge_runs() {
    let values = bands(&[(5, 0.0), (40, 900.0), (6, 0.0), (40, 900.0), (4, 0.0)]);
    let regions = detect_gutters(&profile(values), 50.0, 3);
    assert_eq!(
        regions,
        vec![
            GutterRegion::new(0, 4),
            GutterRegion::new(45, 50),
            GutterRegion::new(91, 94),
        ]
    );
}

#[test]
fn short_runs_are_discarded() {
    let values = bands(&[(30, 900.0), (2, 0.0), (30, 900.0), (3, 0.0), (30, 900.0)]);
    let regions = detect_gutters(&profile(values), 50.0, 3);
    assert_eq!(regions, vec![GutterRegion::new(62, 64)]);
}

#[test]
fn value_equal_to_threshold_breaks_run() {
    let values = bands(&[(3, 10.0), (1, 50.0), (3, 10.0)]);
    let regions = detect_gutters(&profile(values), 50.0, 3);
    assert_eq!(regions, vec![GutterRegion::new(0, 2), GutterRegion::new(4, 6)]);
}

#[test]
fn fully_uniform_axis_is_one_region() {
    let regions = detect_gutters(&profile(vec![0.0; 64]), 50.0, 3);
    assert_eq!(regions, vec![GutterRegion::new(0, 63)]);
}

#[test]
fn regions_are_sorted_and_disjoint() {
    let values = bands(&[(3, 0.0), (10, 500.0), (3, 0.0), (10, 500.0), (3, 0.0)]);
    let regions = detect_gutters(&profile(values), 50.0, 3);
    for pair in regions.windows(2) {
        assert!(pair[0].end < pair[1].start);
    }
}

#[test]
fn min_width_adapts_to_cell_extent() {
    let cfg = GutterConfig::default();
    assert_eq!(min_gutter_width(100.0, &cfg), 3);
    assert_eq!(min_gutter_width(390.0, &cfg), 4);
    assert_eq!(min_gutter_width(2000.0, &cfg), 20);
}
