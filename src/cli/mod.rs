//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Veil using clap.

pub mod commands;

use crate::config::{default_config, load_config, VeilConfig};
use crate::domain::Result;
use clap::{Parser, Subcommand};
use std::path::Path;

/// Veil - PII detection and anonymization
#[derive(Parser, Debug)]
#[command(name = "veil")]
#[command(version, about, long_about = None)]
#[command(author = "Veil Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "veil.toml", env = "VEIL_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "VEIL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect and anonymize PII in files or stdin
    Process(commands::process::ProcessArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),

    /// Show the model label to PII type mapping
    Labels(commands::labels::LabelsArgs),
}

/// Load `path`, or the built-in configuration when the file does not exist
pub fn load_or_default(path: &str) -> Result<VeilConfig> {
    if Path::new(path).exists() {
        load_config(path)
    } else {
        tracing::debug!(config_path = %path, "Configuration file not found, using defaults");
        default_config()
    }
}
