use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        BorderError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(BorderError::host("x").to_string().contains("host error:"));
    assert!(
        BorderError::worker("x")
            .to_string()
            .contains("worker error:")
    );
    assert!(
        BorderError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert!(
        BorderError::IndexOverflow { len: 7 }
            .to_string()
            .contains("7 pixels")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = BorderError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn configuration_errors_are_classified() {
    assert!(BorderError::validation("x").is_configuration());
    assert!(BorderError::IndexOverflow { len: 1 }.is_configuration());
    assert!(!BorderError::host("x").is_configuration());
    assert!(!BorderError::worker("x").is_configuration());
}
