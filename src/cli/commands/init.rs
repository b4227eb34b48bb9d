//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "veil.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Veil configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Put your inference token in a .env file:");
                println!("     HF_API_TOKEN=hf_...");
                println!("     and uncomment recognizer.api_token");
                println!("  3. Validate configuration: veil validate-config");
                println!("  4. Run: veil process notes.txt");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Generate the starter configuration
    fn generate_config() -> String {
        r#"# Veil Configuration File
# PII detection and anonymization

[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Detection
# ============================================================================
[detector]
# PII types to report: email, phone, ssn, creditCard, name, address,
# ipAddress, dateOfBirth, passport, custom
types = ["email", "phone", "name", "creditCard", "ssn", "address", "ipAddress"]

# Detections scoring below this are discarded (0.0-1.0)
confidence_threshold = 0.8

# Substitution style for text output: mask | label | remove | replace
mode = "mask"

# Replace the built-in fallback patterns with your own library
# pattern_library = "patterns/custom.toml"

# ============================================================================
# NER recognizer
# ============================================================================
[recognizer]
# When disabled or unreachable, detection uses the pattern fallback
enabled = true
endpoint = "https://api-inference.huggingface.co/models/iiiorg/piiranha-v1-detect-personal-information"
# api_token = "${HF_API_TOKEN}"
model_name = "Piiranha v1"
model_version = "1.0.0"
timeout_seconds = 30
load_timeout_seconds = 120
aggregation_strategy = "simple"
ignore_labels = ["O"]
# Unit of the offsets returned by the endpoint: chars | bytes
offset_unit = "chars"

# ============================================================================
# Audit trail (PII values are stored as SHA-256 hashes only)
# ============================================================================
[audit]
enabled = false
log_path = "./audit/detections.log"
json_format = true

# ============================================================================
# Logging
# ============================================================================
[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"  # daily | hourly | never
"#
        .to_string()
    }
}
