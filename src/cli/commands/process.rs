//! Process command implementation
//!
//! This module implements the `process` command, which detects and
//! anonymizes PII in files or standard input.

use crate::anonymization::config::{parse_type_list, AnonymizationMode};
use crate::anonymization::report::ScanSummary;
use crate::cli::load_or_default;
use crate::config::VeilConfig;
use crate::core::processing::render;
use crate::core::session::{ExportFormat, Session};
use crate::domain::VeilError;
use anyhow::Context;
use clap::Args;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Arguments for the process command
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Input files; standard input is read when none are given
    pub files: Vec<PathBuf>,

    /// Output format (txt, json, csv)
    #[arg(short, long, default_value = "txt")]
    pub format: String,

    /// Output file, or directory when several inputs are given
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Substitution style for text output (mask, label, remove, replace)
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Override the confidence threshold (0.0-1.0)
    #[arg(long)]
    pub threshold: Option<f32>,

    /// Override the enabled PII types (comma-separated)
    #[arg(long)]
    pub types: Option<String>,

    /// Use the pattern fallback only
    #[arg(long)]
    pub no_recognizer: bool,
}

struct Input {
    source: String,
    path: Option<PathBuf>,
    text: String,
}

impl ProcessArgs {
    /// Execute the process command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, inputs = self.files.len(), "Starting process command");

        let format: ExportFormat = match self.format.parse() {
            Ok(f) => f,
            Err(e) => {
                eprintln!("❌ {e}. Use txt, json or csv");
                return Ok(2);
            }
        };

        let config = match self.build_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Invalid configuration");
                eprintln!("❌ Configuration error: {e:#}");
                return Ok(2);
            }
        };

        let mut session = match Session::start(&config).await {
            Ok(s) => s,
            Err(VeilError::Configuration(msg)) => {
                eprintln!("❌ Configuration error: {msg}");
                return Ok(2);
            }
            Err(e) => return Err(e.into()),
        };

        if config.recognizer.enabled {
            let status = session.wait_until_initialized().await;
            tracing::info!(status = %status, "Detection backend settled");
        }

        let inputs = self.read_inputs()?;
        let multiple = inputs.len() > 1;
        let mut summary = ScanSummary::new();

        for input in &inputs {
            let result = session.process_text(&input.text).await?.clone();
            summary.add_result(&input.source, &result);

            let content = match format {
                ExportFormat::Txt => render(&result, session.config().mode)?,
                _ => session.export(format).await?.content,
            };

            self.write_output(input, format, &content, multiple)?;
        }

        if multiple {
            eprint!("{}", summary.format_console());
        }

        Ok(0)
    }

    fn build_config(&self, config_path: &str) -> anyhow::Result<VeilConfig> {
        let mut config = load_or_default(config_path)?;

        if self.no_recognizer {
            tracing::info!("Disabling recognizer from CLI");
            config.recognizer.enabled = false;
        }

        if let Some(threshold) = self.threshold {
            tracing::info!(threshold, "Overriding confidence threshold from CLI");
            config.detector.confidence_threshold = threshold;
        }

        if let Some(ref types) = self.types {
            config.detector.types = parse_type_list(types)?;
            tracing::info!(types = ?config.detector.types, "Overriding PII types from CLI");
        }

        if let Some(ref mode) = self.mode {
            config.detector.mode = mode.parse::<AnonymizationMode>().map_err(anyhow::Error::msg)?;
            tracing::info!(mode = %config.detector.mode, "Overriding anonymization mode from CLI");
        }

        config.validate().map_err(anyhow::Error::msg)?;
        Ok(config)
    }

    fn read_inputs(&self) -> anyhow::Result<Vec<Input>> {
        if self.files.is_empty() {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read standard input")?;
            return Ok(vec![Input {
                source: "stdin".to_string(),
                path: None,
                text,
            }]);
        }

        self.files
            .iter()
            .map(|path| {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                Ok(Input {
                    source: path.display().to_string(),
                    path: Some(path.clone()),
                    text,
                })
            })
            .collect()
    }

    fn write_output(
        &self,
        input: &Input,
        format: ExportFormat,
        content: &str,
        multiple: bool,
    ) -> anyhow::Result<()> {
        let Some(ref output) = self.output else {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{content}")?;
            return Ok(());
        };

        let target = if multiple {
            std::fs::create_dir_all(output)
                .with_context(|| format!("Failed to create {}", output.display()))?;
            output.join(output_name(input.path.as_deref(), format))
        } else {
            output.clone()
        };

        std::fs::write(&target, content)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        tracing::info!(source = %input.source, output = %target.display(), "Wrote output");
        Ok(())
    }
}

/// File name for the output of `input` inside an output directory
fn output_name(input: Option<&Path>, format: ExportFormat) -> String {
    let stem = input
        .and_then(|p| p.file_stem())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "stdin".to_string());
    format!("{stem}.anonymized.{format}")
}
