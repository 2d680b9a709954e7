use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SeamError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        SeamError::detection("x")
            .to_string()
            .contains("detection error:")
    );
    assert!(SeamError::media("x").to_string().contains("media error:"));
    assert!(
        SeamError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert_eq!(SeamError::Cancelled.to_string(), "operation cancelled");
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SeamError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
