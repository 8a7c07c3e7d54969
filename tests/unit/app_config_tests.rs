/*!
 * Tests for application configuration functionality
 */

use reelwright::app_config::{Config, LogLevel};

use crate::common::{create_temp_dir, create_test_file};

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.script.model, "gpt-4.1-mini");
    assert_eq!(config.script.endpoint, "https://api.openai.com/v1");
    assert_eq!(config.speech.endpoint, "https://api.fish.audio");
    assert_eq!(config.speech.concurrent_requests, 4);
    assert_eq!(config.quiz.question_count, 3);
    assert_eq!(config.quiz.max_attempts, 5);
    assert_eq!(config.layout.canvas_width, 1080);
    assert_eq!(config.layout.canvas_height, 1920);
    assert_eq!(config.layout.words_per_chunk, 3);
    assert_eq!(config.render.fps, 30);
    assert_eq!(config.paths.posted_dir.to_str(), Some("posted"));
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.script.endpoint = "not a url".to_string();
    assert!(config.validate().is_err());
    config.script.endpoint = "https://api.openai.com/v1".to_string();

    config.speech.concurrent_requests = 0;
    assert!(config.validate().is_err());
    config.speech.concurrent_requests = 2;

    config.layout.words_per_chunk = 0;
    assert!(config.validate().is_err());
    config.layout.words_per_chunk = 3;

    config.quiz.max_attempts = 0;
    assert!(config.validate().is_err());
    config.quiz.enabled = false;
    assert!(config.validate().is_ok());
}

/// Credentials are only required when asked for
#[test]
fn test_validate_credentials_withMissingKeys_shouldFail() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());
    assert!(config.validate_credentials().is_err());

    config.script.api_key = "sk-test".to_string();
    assert!(config.validate_credentials().is_err());

    config.speech.api_key = "fish-test".to_string();
    assert!(config.validate_credentials().is_ok());
}

/// A missing config file is created with defaults
#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let (config, created) = Config::load_or_create(&path).unwrap();

    assert!(created);
    assert!(path.exists());
    assert_eq!(config.render.fps, 30);

    let (_, created_again) = Config::load_or_create(&path).unwrap();
    assert!(!created_again);
}

/// Partial config files fall back to defaults for missing fields
#[test]
fn test_load_or_create_withPartialFile_shouldFillDefaults() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(
        dir.path(),
        "conf.json",
        r#"{ "layout": { "words_per_chunk": 4 }, "log_level": "debug" }"#,
    )
    .unwrap();

    let (config, created) = Config::load_or_create(&path).unwrap();

    assert!(!created);
    assert_eq!(config.layout.words_per_chunk, 4);
    assert_eq!(config.layout.canvas_height, 1920);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.script.temperature, 0.9);
}

/// Malformed config files are reported, not replaced
#[test]
fn test_load_or_create_withInvalidJson_shouldFail() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(dir.path(), "conf.json", "{ not json").unwrap();

    assert!(Config::load_or_create(&path).is_err());
}
