use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ChainviewError::connectivity("x")
            .to_string()
            .contains("connectivity error:")
    );
    assert!(
        ChainviewError::config_fetch("x")
            .to_string()
            .contains("config fetch error:")
    );
    assert!(
        ChainviewError::malformed_stage("x")
            .to_string()
            .contains("malformed stage:")
    );
    assert!(ChainviewError::layout("x").to_string().contains("layout error:"));
    assert!(
        ChainviewError::validation("x")
            .to_string()
            .contains("validation error:")
    );
}

#[test]
fn only_malformed_stage_is_absorbed() {
    assert!(!ChainviewError::malformed_stage("x").is_fatal());
    assert!(ChainviewError::connectivity("x").is_fatal());
    assert!(ChainviewError::config_fetch("x").is_fatal());
    assert!(ChainviewError::layout("x").is_fatal());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ChainviewError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
