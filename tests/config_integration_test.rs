//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables are serialized through a
//! mutex to avoid interference between tests.

use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;
use veil::anonymization::config::AnonymizationMode;
use veil::anonymization::models::PiiType;
use veil::config::{load_config, OffsetUnit};

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("VEIL_APPLICATION_LOG_LEVEL");
    std::env::remove_var("VEIL_DETECTOR_TYPES");
    std::env::remove_var("VEIL_DETECTOR_CONFIDENCE_THRESHOLD");
    std::env::remove_var("VEIL_DETECTOR_MODE");
    std::env::remove_var("VEIL_RECOGNIZER_ENABLED");
    std::env::remove_var("VEIL_RECOGNIZER_TIMEOUT_SECONDS");
    std::env::remove_var("TEST_HF_TOKEN");
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[application]
log_level = "debug"

[detector]
types = ["email", "ssn", "creditCard"]
confidence_threshold = 0.9
mode = "label"

[recognizer]
enabled = true
endpoint = "https://inference.example.com/models/pii"
api_token = "hf_plain_token"
model_name = "Piiranha v1"
model_version = "1.0.0"
timeout_seconds = 10
aggregation_strategy = "first"
ignore_labels = ["O", "MISC"]
offset_unit = "bytes"

[audit]
enabled = true
log_path = "/tmp/veil-audit.log"
json_format = false

[logging]
local_enabled = false
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.detector.types.len(), 3);
    assert!(config.detector.types.contains(&PiiType::CreditCard));
    assert_eq!(config.detector.confidence_threshold, 0.9);
    assert_eq!(config.detector.mode, AnonymizationMode::Label);

    assert!(config.recognizer.enabled);
    assert_eq!(config.recognizer.timeout_seconds, 10);
    assert_eq!(config.recognizer.aggregation_strategy, "first");
    assert_eq!(config.recognizer.ignore_labels, vec!["O", "MISC"]);
    assert_eq!(config.recognizer.offset_unit, OffsetUnit::Bytes);
    assert_eq!(
        config
            .recognizer
            .api_token
            .as_ref()
            .unwrap()
            .expose_secret()
            .as_ref(),
        "hf_plain_token"
    );

    assert!(config.audit.enabled);
    assert!(!config.audit.json_format);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_load_empty_config_with_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config("");
    let config = load_config(file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "info");
    assert_eq!(config.detector.confidence_threshold, 0.8);
    assert_eq!(config.detector.mode, AnonymizationMode::Mask);
    assert_eq!(config.detector.types.len(), 7);
    assert!(!config.detector.types.contains(&PiiType::Passport));
    assert!(!config.recognizer.enabled);
    assert_eq!(config.recognizer.model_name, "Piiranha v1");
    assert!(!config.audit.enabled);
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_HF_TOKEN", "hf_from_env");

    let file = write_config(
        r#"
[recognizer]
enabled = true
api_token = "${TEST_HF_TOKEN}"
"#,
    );

    let config = load_config(file.path()).expect("Failed to load config");
    assert_eq!(
        config
            .recognizer
            .api_token
            .as_ref()
            .unwrap()
            .expose_secret()
            .as_ref(),
        "hf_from_env"
    );

    cleanup_env_vars();
}

#[test]
fn test_missing_env_var_is_an_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[recognizer]
api_token = "${TEST_HF_TOKEN}"
"#,
    );

    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("TEST_HF_TOKEN"));
}

#[test]
fn test_env_var_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("VEIL_APPLICATION_LOG_LEVEL", "trace");
    std::env::set_var("VEIL_DETECTOR_TYPES", "email,phone");
    std::env::set_var("VEIL_DETECTOR_CONFIDENCE_THRESHOLD", "0.5");
    std::env::set_var("VEIL_DETECTOR_MODE", "remove");
    std::env::set_var("VEIL_RECOGNIZER_TIMEOUT_SECONDS", "7");

    let file = write_config(
        r#"
[detector]
confidence_threshold = 0.9
mode = "label"
"#,
    );

    let config = load_config(file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "trace");
    assert_eq!(config.detector.types.len(), 2);
    assert_eq!(config.detector.confidence_threshold, 0.5);
    assert_eq!(config.detector.mode, AnonymizationMode::Remove);
    assert_eq!(config.recognizer.timeout_seconds, 7);

    cleanup_env_vars();
}

#[test]
fn test_invalid_config_validation() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let cases = [
        "[detector]\nconfidence_threshold = 1.5\n",
        "[detector]\nmode = \"blur\"\n",
        "[detector]\ntypes = [\"email\", \"shoe_size\"]\n",
        "[recognizer]\nenabled = true\nendpoint = \"not a url\"\n",
        "[recognizer]\nenabled = true\ntimeout_seconds = 0\n",
        "[recognizer]\nenabled = true\naggregation_strategy = \"median\"\n",
        "[application]\nlog_level = \"loud\"\n",
        "[logging]\nlocal_rotation = \"weekly\"\n",
    ];

    for contents in cases {
        let file = write_config(contents);
        assert!(
            load_config(file.path()).is_err(),
            "expected rejection of {contents:?}"
        );
    }
}
