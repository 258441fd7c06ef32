use super::*;
use crate::config::model::StageDescriptor;

fn one_channel() -> Vec<ChannelConfig> {
    vec![ChannelConfig::new(vec![StageDescriptor::input("hw:0", "S32LE")])]
}

#[test]
fn linearize_requires_a_download() {
    let mut src = StaticConfigSource::new(one_channel());
    let err = pollster::block_on(src.linearize_config()).unwrap_err();
    assert!(matches!(err, ChainviewError::ConfigFetch(_)));

    pollster::block_on(src.download_config()).unwrap();
    let channels = pollster::block_on(src.linearize_config()).unwrap();
    assert_eq!(channels, one_channel());
}

#[test]
fn download_fails_without_connection() {
    let mut src = StaticConfigSource::disconnected();
    assert!(!src.is_connected());
    let err = pollster::block_on(src.download_config()).unwrap_err();
    assert!(matches!(err, ChainviewError::Connectivity(_)));

    src.set_connected(true);
    pollster::block_on(src.download_config()).unwrap();
    assert_eq!(src.snapshot(), Some(&[][..]));
}

#[test]
fn published_changes_appear_after_next_download() {
    let mut src = StaticConfigSource::new(one_channel());
    pollster::block_on(src.download_config()).unwrap();

    src.publish(vec![]);
    assert_eq!(pollster::block_on(src.linearize_config()).unwrap().len(), 1);

    pollster::block_on(src.download_config()).unwrap();
    assert!(pollster::block_on(src.linearize_config()).unwrap().is_empty());
}

#[test]
fn missing_file_is_a_validation_error() {
    let err = StaticConfigSource::from_path("target/does/not/exist.json").unwrap_err();
    assert!(matches!(err, ChainviewError::Validation(_)));
}
