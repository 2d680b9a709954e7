use super::*;

fn cfg() -> ResolverConfig {
    ResolverConfig::default()
}

fn centers(layout: &AxisLayout) -> Vec<u32> {
    layout.dividers.iter().map(|d| d.region.center).collect()
}

#[test]
fn exact_dividers_produce_inset_spans() {
    let regions = [GutterRegion::new(387, 406), GutterRegion::new(794, 813)];
    let layout = resolve_axis(Axis::Columns, &regions, 3, 1200, &cfg()).unwrap();
    assert_eq!(layout.margin, 3);
    assert_eq!(
        layout.spans,
        vec![
            Span { start: 3, len: 381 },
            Span {
                start: 410,
                len: 381
            },
            Span {
                start: 817,
                len: 380
            },
        ]
    );
    assert!(!layout.is_shortfall());
    assert!(!layout.is_excess());
    assert!(layout.confidence() > 0.95);
}

#[test]
fn excess_regions_pick_evenly_spaced_subset() {
    let regions = [
        GutterRegion::new(98, 102),
        GutterRegion::new(390, 409),
        GutterRegion::new(418, 422),
        GutterRegion::new(790, 809),
    ];
    let layout = resolve_axis(Axis::Columns, &regions, 3, 1200, &cfg()).unwrap();
    assert_eq!(centers(&layout), vec![399, 799]);
    assert!(layout.is_excess());
    assert_eq!(layout.spans.len(), 3);
}

#[test]
fn excess_selection_falls_back_to_first_by_position() {
    // All candidates are crowded together, so spacing-based selection under-selects.
    let regions = [
        GutterRegion::new(300, 305),
        GutterRegion::new(320, 325),
        GutterRegion::new(340, 345),
    ];
    let layout = resolve_axis(Axis::Rows, &regions, 3, 1200, &cfg()).unwrap();
    assert_eq!(centers(&layout), vec![302, 322]);
}

#[test]
fn shortfall_interpolates_missing_divider_and_flags_it() {
    let regions = [GutterRegion::new(290, 309)];
    let layout = resolve_axis(Axis::Columns, &regions, 3, 900, &cfg()).unwrap();
    assert!(layout.is_shortfall());
    assert_eq!(layout.dividers.len(), 2);
    assert!(!layout.dividers[0].synthetic);
    assert!(layout.dividers[1].synthetic);
    assert_eq!(layout.dividers[1].region, GutterRegion::new(590, 609));
    assert_eq!(layout.spans.len(), 3);
    assert!(layout.confidence() < 0.6);
}

#[test]
fn no_regions_single_cell_uses_whole_axis() {
    let layout = resolve_axis(Axis::Rows, &[], 1, 500, &cfg()).unwrap();
    assert_eq!(layout.spans, vec![Span { start: 3, len: 494 }]);
    assert!(!layout.is_shortfall());
    assert_eq!(layout.confidence(), 1.0);
}

#[test]
fn no_regions_multi_cell_divides_equally() {
    let layout = resolve_axis(Axis::Columns, &[], 3, 1200, &cfg()).unwrap();
    assert!(layout.dividers.iter().all(|d| d.synthetic));
    assert_eq!(
        layout.spans,
        vec![
            Span { start: 3, len: 394 },
            Span {
                start: 404,
                len: 393
            },
            Span {
                start: 804,
                len: 393
            },
        ]
    );
    assert_eq!(layout.confidence(), 0.0);
}

#[test]
fn edge_margins_bound_the_content() {
    let regions = [GutterRegion::new(0, 19), GutterRegion::new(1180, 1199)];
    let layout = resolve_axis(Axis::Columns, &regions, 1, 1200, &cfg()).unwrap();
    assert_eq!(layout.content_start, 20);
    assert_eq!(layout.content_end, 1180);
    assert_eq!(layout.internal_regions, 0);
    assert_eq!(layout.spans, vec![Span { start: 23, len: 1154 }]);
}

#[test]
fn fully_uniform_axis_falls_back_to_full_extent() {
    let regions = [GutterRegion::new(0, 799)];
    let layout = resolve_axis(Axis::Rows, &regions, 2, 800, &cfg()).unwrap();
    assert_eq!(layout.content_start, 0);
    assert_eq!(layout.content_end, 800);
    assert_eq!(layout.spans.len(), 2);
    assert!(layout.is_shortfall());
}

#[test]
fn invalid_counts_are_rejected() {
    assert!(matches!(
        resolve_axis(Axis::Rows, &[], 0, 100, &cfg()),
        Err(SeamError::Validation(_))
    ));
    assert!(matches!(
        resolve_axis(Axis::Rows, &[], 5, 4, &cfg()),
        Err(SeamError::Detection(_))
    ));
}

#[test]
fn spans_never_overlap_dividers() {
    let regions = [GutterRegion::new(387, 406), GutterRegion::new(794, 813)];
    let layout = resolve_axis(Axis::Columns, &regions, 3, 1200, &cfg()).unwrap();
    for (span, divider) in layout.spans.iter().zip(&layout.dividers) {
        assert!(span.end() + layout.margin <= divider.region.start);
    }
    for (divider, span) in layout.dividers.iter().zip(layout.spans.iter().skip(1)) {
        assert!(divider.region.end + layout.margin < span.start);
    }
}

#[test]
fn cells_are_row_major_cross_product() {
    let cols = resolve_axis(Axis::Columns, &[], 3, 300, &cfg()).unwrap();
    let rows = resolve_axis(Axis::Rows, &[], 2, 200, &cfg()).unwrap();
    let cells = cells_from_layouts(&rows, &cols);
    assert_eq!(cells.len(), 6);
    assert_eq!(cells[0].y, cells[2].y);
    assert!(cells[0].x < cells[1].x && cells[1].x < cells[2].x);
    assert!(cells[3].y > cells[0].y);
    assert_eq!(cells[3].x, cells[0].x);
}
