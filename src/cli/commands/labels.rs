//! Labels command implementation
//!
//! Prints the table used to map recognizer labels onto PII types.

use crate::anonymization::detector::labels::{LABEL_TABLE, LABEL_TABLE_VERSION};
use crate::anonymization::models::PiiType;
use clap::Args;

/// Arguments for the labels command
#[derive(Args, Debug)]
pub struct LabelsArgs {
    /// Print the table as JSON
    #[arg(long)]
    pub json: bool,
}

impl LabelsArgs {
    /// Execute the labels command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(&label_table_json())?);
            return Ok(0);
        }

        println!("Label table v{LABEL_TABLE_VERSION}");
        println!();
        println!("  {:24} {:12} PLACEHOLDER", "MODEL LABEL", "PII TYPE");
        for (label, pii_type) in LABEL_TABLE {
            println!(
                "  {:24} {:12} [{}]",
                label,
                pii_type.as_str(),
                pii_type.placeholder_name()
            );
        }
        println!(
            "  {:24} {:12} [{}]",
            "(other)",
            PiiType::Custom.as_str(),
            PiiType::Custom.placeholder_name()
        );
        println!();
        println!("B- and I- prefixes are stripped before lookup.");

        Ok(0)
    }
}

fn label_table_json() -> serde_json::Value {
    let mappings: serde_json::Map<String, serde_json::Value> = LABEL_TABLE
        .iter()
        .map(|(label, pii_type)| (label.to_string(), serde_json::json!(pii_type)))
        .collect();

    serde_json::json!({
        "version": LABEL_TABLE_VERSION,
        "mappings": mappings,
        "default": PiiType::Custom,
    })
}
