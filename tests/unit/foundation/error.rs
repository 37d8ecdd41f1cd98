use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SinusError::init("x")
            .to_string()
            .contains("initialization error:")
    );
    assert!(
        SinusError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(SinusError::export("x").to_string().contains("export error:"));
    assert!(SinusError::decode("x").to_string().contains("decode error:"));
    assert!(
        SinusError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SinusError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn only_validation_counts_as_precondition() {
    assert!(SinusError::validation("cap").is_precondition());
    assert!(!SinusError::export("empty stream").is_precondition());
    assert!(!SinusError::init("no surface").is_precondition());
}
