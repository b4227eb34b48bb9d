//! Configuration schema types
//!
//! This module defines the configuration structure of `veil.toml`. Every
//! section is optional; an empty file yields a fallback-only configuration.

use crate::anonymization::config::{AuditConfig, DetectorConfig};
use crate::config::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Main Veil configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VeilConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Detection filters and output mode
    #[serde(default)]
    pub detector: DetectorConfig,

    /// NER recognizer backend
    #[serde(default)]
    pub recognizer: RecognizerConfig,

    /// Audit trail
    #[serde(default)]
    pub audit: AuditConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl VeilConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.detector.validate().map_err(|e| format!("detector: {e}"))?;
        self.recognizer.validate()?;
        self.audit.validate().map_err(|e| format!("audit: {e}"))?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Unit of the offsets reported by the recognizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetUnit {
    /// Unicode scalar values (Python `str` indices)
    #[default]
    Chars,
    /// UTF-8 bytes
    Bytes,
}

impl fmt::Display for OffsetUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chars => write!(f, "chars"),
            Self::Bytes => write!(f, "bytes"),
        }
    }
}

impl FromStr for OffsetUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chars" => Ok(Self::Chars),
            "bytes" => Ok(Self::Bytes),
            _ => Err(format!("Invalid offset unit '{s}'. Must be one of: chars, bytes")),
        }
    }
}

/// NER recognizer configuration
///
/// The recognizer is an HTTP token-classification endpoint. When disabled,
/// or when it fails to initialize, detection runs on the regex fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognizerConfig {
    /// Use the NER backend
    #[serde(default)]
    pub enabled: bool,

    /// Inference endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Bearer token for the endpoint (optional)
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub api_token: Option<SecretString>,

    /// Display name of the model
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Model version reported by `model_info`
    #[serde(default = "default_model_version")]
    pub model_version: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Timeout of the initialization probe, which waits for the model to load
    #[serde(default = "default_load_timeout_seconds")]
    pub load_timeout_seconds: u64,

    /// Span aggregation strategy requested from the model
    #[serde(default = "default_aggregation_strategy")]
    pub aggregation_strategy: String,

    /// Labels the model should not report
    #[serde(default = "default_ignore_labels")]
    pub ignore_labels: Vec<String>,

    /// Unit of the offsets in the endpoint's responses
    #[serde(default)]
    pub offset_unit: OffsetUnit,
}

impl RecognizerConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if !self.enabled {
            return Ok(());
        }

        let endpoint = url::Url::parse(&self.endpoint)
            .map_err(|e| format!("recognizer.endpoint is not a valid URL: {e}"))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err("recognizer.endpoint must start with http:// or https://".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("recognizer.timeout_seconds must be > 0".to_string());
        }

        if self.load_timeout_seconds == 0 {
            return Err("recognizer.load_timeout_seconds must be > 0".to_string());
        }

        let valid_strategies = ["none", "simple", "first", "average", "max"];
        if !valid_strategies.contains(&self.aggregation_strategy.as_str()) {
            return Err(format!(
                "Invalid recognizer.aggregation_strategy '{}'. Must be one of: {}",
                self.aggregation_strategy,
                valid_strategies.join(", ")
            ));
        }

        if self
            .api_token
            .as_ref()
            .map(|t| t.expose_secret().is_empty())
            .unwrap_or(false)
        {
            return Err("recognizer.api_token cannot be empty when set".to_string());
        }

        Ok(())
    }
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_endpoint(),
            api_token: None,
            model_name: default_model_name(),
            model_version: default_model_version(),
            timeout_seconds: default_timeout_seconds(),
            load_timeout_seconds: default_load_timeout_seconds(),
            aggregation_strategy: default_aggregation_strategy(),
            ignore_labels: default_ignore_labels(),
            offset_unit: OffsetUnit::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_endpoint() -> String {
    "https://api-inference.huggingface.co/models/iiiorg/piiranha-v1-detect-personal-information"
        .to_string()
}

fn default_model_name() -> String {
    "Piiranha v1".to_string()
}

fn default_model_version() -> String {
    "1.0.0".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_load_timeout_seconds() -> u64 {
    120
}

fn default_aggregation_strategy() -> String {
    "simple".to_string()
}

fn default_ignore_labels() -> Vec<String> {
    vec!["O".to_string()]
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
