use super::*;
use crate::grid::options::StrategyKind;
use crate::timing::ease::Ease;

#[test]
fn empty_document_yields_defaults() {
    let cfg = SeamConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, SeamConfig::default());
    assert_eq!(cfg.grid.threshold.lower_bound, 50.0);
    assert_eq!(cfg.retime.mapper.epsilon_secs, 0.001);
    assert_eq!(cfg.logging.level, "info");
}

#[test]
fn partial_sections_override_only_their_keys() {
    let cfg = SeamConfig::from_json_str(
        r#"{
            "grid": { "strategy": "projection", "threshold": { "upper_bound": 250 }, "fill": { "r": 255, "g": 255, "b": 255, "a": 255 } },
            "retime": { "easing": "cubic-bezier(0.3, 0, 0.7, 1)", "bitrate": "6M" },
            "logging": { "level": "seamcut=debug" }
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.grid.strategy, StrategyKind::Projection);
    assert_eq!(cfg.grid.threshold.upper_bound, 250.0);
    assert_eq!(cfg.grid.threshold.percentile, 0.01);
    assert_eq!(cfg.grid.fill.r, 255);
    assert_eq!(cfg.retime.easing, Ease::cubic_bezier(0.3, 0.0, 0.7, 1.0).unwrap());
    assert_eq!(cfg.retime.bitrate.as_deref(), Some("6M"));
    assert!(cfg.logging.ansi);
}

#[test]
fn invalid_values_are_rejected() {
    let bad_range = r#"{ "grid": { "threshold": { "lower_bound": 400 } } }"#;
    assert!(matches!(
        SeamConfig::from_json_str(bad_range),
        Err(SeamError::Validation(_))
    ));
    let bad_easing = r#"{ "retime": { "easing": "wobble" } }"#;
    assert!(matches!(
        SeamConfig::from_json_str(bad_easing),
        Err(SeamError::Serde(_))
    ));
    assert!(matches!(
        SeamConfig::from_json_str("not json"),
        Err(SeamError::Serde(_))
    ));
}

#[test]
fn from_path_reports_missing_files() {
    let err = SeamConfig::from_path(Path::new("/definitely/not/here.json")).unwrap_err();
    assert!(err.to_string().contains("here.json"), "{err}");
}
