//! Configuration management for Veil.
//!
//! This module provides TOML-based configuration loading, parsing, and
//! validation.
//!
//! # Overview
//!
//! Veil uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `VEIL_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use veil::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("veil.toml")?;
//!
//! println!("Threshold: {}", config.detector.confidence_threshold);
//! println!("Recognizer enabled: {}", config.recognizer.enabled);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`DetectorConfig`] - Enabled types, confidence threshold, output mode
//! - [`RecognizerConfig`] - NER endpoint, token and request settings
//! - [`AuditConfig`] - Audit trail
//! - [`LoggingConfig`] - File logging
//!
//! # Example Configuration
//!
//! ```toml
//! [detector]
//! types = ["email", "phone", "name", "creditCard", "ssn", "address", "ipAddress"]
//! confidence_threshold = 0.8
//! mode = "mask"
//!
//! [recognizer]
//! enabled = true
//! endpoint = "https://api-inference.huggingface.co/models/iiiorg/piiranha-v1-detect-personal-information"
//! api_token = "${HF_API_TOKEN}"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use crate::anonymization::config::{AuditConfig, DetectorConfig};
pub use loader::{default_config, load_config, load_config_from_str};
pub use schema::{ApplicationConfig, LoggingConfig, OffsetUnit, RecognizerConfig, VeilConfig};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
