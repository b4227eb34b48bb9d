//! Scan reporting
//!
//! Aggregates the results of several processed documents into a summary
//! with per-type counts, sample substitutions and warnings, printable on
//! the console or as JSON.

use crate::anonymization::engine::assign_slots;
use crate::anonymization::models::{DetectionBackend, DetectionResult, PiiType};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Samples kept per document
const SAMPLES_PER_DOCUMENT: usize = 3;

/// Samples kept per summary
const MAX_SAMPLES: usize = 20;

/// Hex digits of the value digest shown in a sample
const FINGERPRINT_WIDTH: usize = 12;

/// Summary of a multi-document scan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Documents processed
    pub total_documents: usize,

    /// PII detections across all documents
    pub total_detections: usize,

    /// Detections by type
    pub detections_by_type: BTreeMap<PiiType, usize>,

    /// Sample substitutions (before/after)
    pub samples: Vec<SubstitutionSample>,

    /// Warnings worth a second look
    pub warnings: Vec<String>,

    /// Processing statistics
    pub stats: SummaryStats,
}

/// One detection shown before and after substitution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubstitutionSample {
    /// Document the sample comes from
    pub source: String,

    /// Digest prefix and length of the original value; never the value itself
    pub fingerprint: String,

    /// Placeholder it was replaced with
    pub anonymized: String,

    /// PII type
    pub pii_type: PiiType,

    /// Confidence score (0.0-1.0)
    pub confidence: f64,
}

/// Processing statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Average processing time per document (ms)
    pub avg_processing_time_ms: f64,

    /// Total processing time (ms)
    pub total_processing_time_ms: f64,

    /// Documents with PII detected
    pub documents_with_pii: usize,

    /// Documents without PII
    pub documents_without_pii: usize,

    /// Documents handled by the pattern fallback
    pub fallback_documents: usize,
}

impl ScanSummary {
    /// Create a new empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one processed document
    pub fn add_result(&mut self, source: &str, result: &DetectionResult) {
        self.total_documents += 1;
        self.stats.total_processing_time_ms += result.processing_time;
        self.stats.avg_processing_time_ms =
            self.stats.total_processing_time_ms / self.total_documents as f64;

        if result.backend == DetectionBackend::Fallback {
            self.stats.fallback_documents += 1;
        }

        if !result.has_detections() {
            self.stats.documents_without_pii += 1;
            return;
        }

        self.stats.documents_with_pii += 1;
        self.total_detections += result.total_detections();
        for (pii_type, count) in result.counts_by_type() {
            *self.detections_by_type.entry(pii_type).or_insert(0) += count;
        }

        let custom = result
            .detections
            .iter()
            .filter(|d| d.pii_type == PiiType::Custom)
            .count();
        if custom > 0 {
            self.add_warning(format!(
                "{source}: {custom} detection(s) with a label outside the known PII types"
            ));
        }

        let slots = assign_slots(&result.detections);
        for (detection, slot) in result
            .detections
            .iter()
            .zip(&slots)
            .take(SAMPLES_PER_DOCUMENT)
        {
            if self.samples.len() >= MAX_SAMPLES {
                break;
            }
            self.samples.push(SubstitutionSample {
                source: source.to_string(),
                fingerprint: fingerprint(&detection.original_text),
                anonymized: slot.token(),
                pii_type: detection.pii_type,
                confidence: detection.confidence as f64,
            });
        }
    }

    /// Add a warning
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Format summary for console output
    pub fn format_console(&self) -> String {
        let mut output = String::new();
        let rule = "───────────────────────────────────────────────────────────────\n";

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str("                      PII SCAN SUMMARY                         \n");
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output.push_str("📊 SUMMARY\n");
        output.push_str(rule);
        output.push_str(&format!(
            "  Documents Processed:         {}\n",
            self.total_documents
        ));
        output.push_str(&format!(
            "  Documents with PII:          {}\n",
            self.stats.documents_with_pii
        ));
        output.push_str(&format!(
            "  Documents without PII:       {}\n",
            self.stats.documents_without_pii
        ));
        output.push_str(&format!(
            "  Processed by Fallback:       {}\n",
            self.stats.fallback_documents
        ));
        output.push_str(&format!(
            "  Total PII Detected:          {}\n",
            self.total_detections
        ));
        output.push_str(&format!(
            "  Avg Processing Time:         {:.2} ms\n",
            self.stats.avg_processing_time_ms
        ));
        output.push('\n');

        if !self.detections_by_type.is_empty() {
            output.push_str("🔍 PII DETECTIONS BY TYPE\n");
            output.push_str(rule);

            let mut types: Vec<_> = self.detections_by_type.iter().collect();
            types.sort_by(|a, b| b.1.cmp(a.1));

            for (pii_type, count) in types {
                output.push_str(&format!("  {:30} {:>5}\n", pii_type.as_str(), count));
            }
            output.push('\n');
        }

        if !self.samples.is_empty() {
            output.push_str("📝 SAMPLE SUBSTITUTIONS\n");
            output.push_str(rule);

            for (i, sample) in self.samples.iter().take(10).enumerate() {
                output.push_str(&format!("\n  Sample #{}\n", i + 1));
                output.push_str(&format!("    Source:      {}\n", sample.source));
                output.push_str(&format!("    Type:        {}\n", sample.pii_type));
                output.push_str(&format!(
                    "    Confidence:  {:.1}%\n",
                    sample.confidence * 100.0
                ));
                output.push_str(&format!("    Original:    {}\n", sample.fingerprint));
                output.push_str(&format!("    Anonymized:  \"{}\"\n", sample.anonymized));
            }
            output.push('\n');
        }

        if !self.warnings.is_empty() {
            output.push_str("⚠️  WARNINGS\n");
            output.push_str(rule);
            for warning in &self.warnings {
                output.push_str(&format!("  • {}\n", warning));
            }
            output.push('\n');
        }

        output.push_str("═══════════════════════════════════════════════════════════════\n");

        output
    }

    /// Format summary as JSON
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn fingerprint(value: &str) -> String {
    let digest = format!("{:x}", Sha256::digest(value.as_bytes()));
    format!(
        "sha256:{} ({} chars)",
        &digest[..FINGERPRINT_WIDTH],
        value.chars().count()
    )
}
