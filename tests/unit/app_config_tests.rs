/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use std::time::Duration;

use cipherpad::app_config::{Config, LogLevel};
use cipherpad::session::SessionSettings;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.service.endpoint, "http://localhost:5000");
    assert_eq!(config.service.timeout_secs, 30);
    assert_eq!(config.share.base_url, "https://mindall.herokuapp.com/");
    assert_eq!(config.session.debounce_ms, 1000);
    assert_eq!(config.history.max_entries, 50);
    assert!(config.history.path.is_none());
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();

    config.service.endpoint = "".to_string();
    assert!(config.validate().is_err());
    config.service.endpoint = "localhost without scheme".to_string();
    assert!(config.validate().is_err());
    config.service.endpoint = "http://localhost:5000".to_string();

    config.share.base_url = "::".to_string();
    assert!(config.validate().is_err());
    config.share.base_url = "https://example.com/".to_string();

    config.session.debounce_ms = 0;
    assert!(config.validate().is_err());
    config.session.debounce_ms = 300;

    config.history.max_entries = 0;
    assert!(config.validate().is_err());
    config.history.max_entries = 1;

    assert!(config.validate().is_ok());
}

/// Test that a missing config file is created with defaults
#[test]
fn test_loadOrCreate_missingFile_shouldWriteDefaults() -> Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;

    assert!(path.exists());
    assert_eq!(config.session.debounce_ms, 1000);
    Ok(())
}

/// Test saving and loading preserves values
#[test]
fn test_saveThenLoad_shouldPreserveValues() -> Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("conf.json");

    let mut config = Config::default();
    config.service.endpoint = "http://cipher.local:8080".to_string();
    config.session.debounce_ms = 250;
    config.log_level = LogLevel::Debug;
    config.save(&path)?;

    let loaded = Config::load_or_create(&path)?;
    assert_eq!(loaded.service.endpoint, "http://cipher.local:8080");
    assert_eq!(loaded.session.debounce_ms, 250);
    assert_eq!(loaded.log_level, LogLevel::Debug);
    Ok(())
}

/// Test that an unparseable file is reported
#[test]
fn test_loadOrCreate_invalidJson_shouldFail() -> Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("conf.json");
    std::fs::write(&path, "{ nope")?;

    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}

/// Test that session settings follow the config
#[test]
fn test_sessionSettings_fromConfig_shouldCopyTimingAndShareBase() {
    let mut config = Config::default();
    config.session.debounce_ms = 400;
    config.share.base_url = "https://example.com/s".to_string();

    let settings = SessionSettings::from_config(&config);

    assert_eq!(settings.quiet_period, Duration::from_millis(400));
    assert_eq!(settings.share_base_url, "https://example.com/s");
}
