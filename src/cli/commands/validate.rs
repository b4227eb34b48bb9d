//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Veil configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Parsing includes validation
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);

        let types: Vec<&str> = config.detector.types.iter().map(|t| t.as_str()).collect();
        println!("  PII Types: {}", types.join(", "));
        println!(
            "  Confidence Threshold: {}",
            config.detector.confidence_threshold
        );
        println!("  Mode: {}", config.detector.mode);
        match config.detector.pattern_library {
            Some(ref path) => println!("  Pattern Library: {}", path.display()),
            None => println!("  Pattern Library: built-in"),
        }

        if config.recognizer.enabled {
            println!(
                "  Recognizer: {} {} at {}",
                config.recognizer.model_name,
                config.recognizer.model_version,
                config.recognizer.endpoint
            );
            println!(
                "  Recognizer Token: {}",
                if config.recognizer.api_token.is_some() {
                    "set"
                } else {
                    "not set"
                }
            );
            println!("  Request Timeout: {}s", config.recognizer.timeout_seconds);
        } else {
            println!("  Recognizer: disabled (pattern fallback only)");
        }

        if config.audit.enabled {
            println!("  Audit Log: {}", config.audit.log_path.display());
        } else {
            println!("  Audit Log: disabled");
        }
        println!();

        Ok(0)
    }
}
