//! Invalid configuration -> appropriate error messages.
//!
//! Validates that bad configuration is rejected with clear,
//! actionable error messages pointing to the problematic field.

use vigil_core::config::VigilConfig;
use vigil_core::error::{ConfigError, VigilError};

/// Malformed TOML syntax -> parse error.
#[tokio::test]
async fn test_e2e_invalid_toml_syntax() {
    let result = VigilConfig::parse("invalid = [[[toml");

    let err = result.expect_err("malformed TOML should fail to parse");
    assert!(matches!(err, VigilError::Config(ConfigError::ParseFailed { .. })));
}

/// Zero SYN threshold -> validation error naming the field.
#[tokio::test]
async fn test_e2e_invalid_syn_threshold() {
    let config = VigilConfig::parse(
        r#"
[detector]
enabled = true
interface = "eth0"
threshold_syn = 0
"#,
    )
    .expect("TOML parsing should succeed even with a logically-invalid value");

    let err = config.validate().expect_err("zero threshold should be rejected");
    let msg = err.to_string();
    assert!(
        msg.contains("threshold_syn"),
        "error should mention the offending field, got: {}",
        msg
    );
}

/// Required field missing when the detector is enabled -> clear error.
#[tokio::test]
async fn test_e2e_missing_required_interface() {
    let config = VigilConfig::parse(
        r#"
[detector]
enabled = true
interface = ""
"#,
    )
    .expect("TOML parsing should succeed");

    let err = config.validate().expect_err("empty interface should be rejected");
    assert!(
        err.to_string().contains("interface"),
        "error should mention 'interface'"
    );
}

/// Non-existent config file path -> FileNotFound error.
#[tokio::test]
async fn test_e2e_nonexistent_config_path() {
    let result = VigilConfig::from_file("/nonexistent/vigil.toml").await;

    let err = result.expect_err("loading a missing file should fail");
    assert!(matches!(err, VigilError::Config(ConfigError::FileNotFound { .. })));
}

/// Empty config file -> all defaults applied, validation passes.
#[tokio::test]
async fn test_e2e_empty_config_uses_defaults() {
    let config = VigilConfig::parse("").expect("empty config should parse to defaults");

    assert!(config.validate().is_ok(), "defaults should always validate");
    assert!(!config.detector.enabled);
    assert_eq!(config.detector.threshold_syn, 100);
}

/// Malformed whitelist CIDR entry -> validation error naming the value.
#[tokio::test]
async fn test_e2e_invalid_whitelist_cidr() {
    let config = VigilConfig::parse(
        r#"
[detector]
whitelist = ["10.0.0.0/99"]
"#,
    )
    .expect("TOML parsing should succeed");

    let err = config
        .validate()
        .expect_err("a prefix length over 32 should be rejected");
    assert!(err.to_string().contains("whitelist"));
}

/// Zero cleanup interval -> validation error.
#[tokio::test]
async fn test_e2e_invalid_cleanup_interval() {
    let config = VigilConfig::parse(
        r#"
[detector]
cleanup_interval_secs = 0
"#,
    )
    .expect("TOML parsing should succeed");

    let err = config
        .validate()
        .expect_err("zero cleanup interval should be rejected");
    assert!(err.to_string().contains("cleanup_interval_secs"));
}
