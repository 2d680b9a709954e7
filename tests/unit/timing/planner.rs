use super::*;

fn fps30() -> Fps {
    Fps::new(30, 1).unwrap()
}

#[test]
fn global_indices_are_gapless_across_segments() {
    let plan = plan_segments(
        Ease::InOutCubic,
        &[4.0, 2.5, 6.0],
        1.5,
        fps30(),
        &MapperOptions::default(),
    )
    .unwrap();
    assert_eq!(plan.len(), 135);
    for (i, f) in plan.frames.iter().enumerate() {
        assert_eq!(f.index, FrameIndex(i as u64));
    }
    let ranges: Vec<(u64, u64)> = plan
        .segments
        .iter()
        .map(|s| (s.range.start.0, s.range.end.0))
        .collect();
    assert_eq!(ranges, [(0, 45), (45, 90), (90, 135)]);
    assert!((plan.duration_secs() - 4.5).abs() < 1e-12);
}

#[test]
fn frames_keep_their_segment_attribution() {
    let sources = [4.0, 2.5];
    let plan = plan_segments(Ease::Linear, &sources, 1.0, fps30(), &MapperOptions::default())
        .unwrap();
    for (k, &d) in sources.iter().enumerate() {
        let local = plan.plan_for_segment(k).unwrap();
        let frames = plan.frames_for_segment(k);
        assert_eq!(frames.len(), local.len());
        for (j, f) in frames.iter().enumerate() {
            assert_eq!(f.segment, k);
            assert_eq!(f.local_index, j as u64);
            assert_eq!(f.source_time, local.times[j]);
            assert!(f.source_time < d);
        }
    }
    assert!(plan.plan_for_segment(2).is_none());
    assert!(plan.frames_for_segment(2).is_empty());
}

#[test]
fn empty_segment_list_is_rejected() {
    assert!(matches!(
        plan_segments(Ease::Linear, &[], 1.0, fps30(), &MapperOptions::default()),
        Err(SeamError::Validation(_))
    ));
}

#[test]
fn bad_segment_is_named_in_the_error() {
    let err = plan_segments(Ease::Linear, &[1.0, -2.0], 1.0, fps30(), &MapperOptions::default())
        .unwrap_err();
    assert!(err.to_string().contains("segment 1"), "{err}");
}

#[test]
fn plan_serializes_to_json() {
    let plan = plan_segments(Ease::OutSine, &[2.0], 0.1, fps30(), &MapperOptions::default())
        .unwrap();
    let v = serde_json::to_value(&plan).unwrap();
    assert_eq!(v["frames"].as_array().unwrap().len(), 3);
    assert_eq!(v["segments"][0]["range"]["end"], 3);
    assert_eq!(v["fps"]["num"], 30);
}
