/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use potranslate::app_config::{Config, LogLevel};

#[test]
fn test_default_config_shouldUseDocumentedServiceSizes() {
    let config = Config::default();

    assert_eq!(config.source_language, "auto");
    assert_eq!(config.pot_dir, "pot");
    assert_eq!(config.locale_dir, "locale");
    assert!(!config.auto_save);
    assert!(!config.compile);
    assert_eq!(config.translation.min_chars_per_request, 5000);
    assert_eq!(config.translation.max_chars_per_request, 30000);
    assert_eq!(config.translation.timeout_secs, 30);
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn test_parse_config_withPartialJson_shouldFillDefaults() -> Result<()> {
    let json = r#"{
        "source_language": "en",
        "target_languages": ["fr", "es"],
        "translation": {
            "api_key": "test-key",
            "max_chars_per_request": 10000
        }
    }"#;

    let config: Config = serde_json::from_str(json)?;

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_languages, vec!["fr", "es"]);
    assert_eq!(config.translation.api_key, "test-key");
    assert_eq!(config.translation.max_chars_per_request, 10000);
    // Omitted fields take their defaults.
    assert_eq!(config.translation.min_chars_per_request, 5000);
    assert_eq!(config.pot_dir, "pot");
    Ok(())
}

#[test]
fn test_validate_withDefaultConfig_shouldPass() {
    let config = Config::default();
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_withInvertedBatchLimits_shouldFail() {
    let mut config = Config::default();
    config.translation.min_chars_per_request = 30000;
    config.translation.max_chars_per_request = 5000;

    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withZeroBatchLimit_shouldFail() {
    let mut config = Config::default();
    config.translation.min_chars_per_request = 0;

    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withBogusLanguage_shouldFail() {
    let mut config = Config::default();
    config.target_languages = vec!["notalang".to_string()];

    assert!(config.validate().is_err());
}

#[test]
fn test_config_roundtrip_withJsonSerialization_shouldPreserveFields() -> Result<()> {
    let mut config = Config::default();
    config.source_language = "de".to_string();
    config.translation.max_chars_per_request = 12000;
    config.auto_save = true;

    let json = config.to_json()?;
    let reparsed: Config = serde_json::from_str(&json)?;

    assert_eq!(reparsed.source_language, "de");
    assert_eq!(reparsed.translation.max_chars_per_request, 12000);
    assert!(reparsed.auto_save);
    Ok(())
}

#[test]
fn test_load_or_default_withMissingFile_shouldReturnDefaults() -> Result<()> {
    let config = Config::load_or_default("does-not-exist.json")?;
    assert_eq!(config.translation.min_chars_per_request, 5000);
    Ok(())
}
