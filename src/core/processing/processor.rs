//! Result aggregation for a single document

use super::stats::{ProcessingStats, StatsTracker};
use crate::anonymization::audit::AuditLogger;
use crate::anonymization::config::{AnonymizationMode, DetectorConfig};
use crate::anonymization::detector::{BackendStatus, PiiDetector};
use crate::anonymization::engine::anonymize;
use crate::anonymization::models::DetectionResult;
use crate::domain::Result;
use crate::log_detection_summary;
use std::sync::Arc;
use std::time::Instant;

/// Runs detection and anonymization for one document at a time
///
/// The processor owns the statistics record and the audit trail. The
/// detector is shared and may be used elsewhere concurrently.
pub struct PiiProcessor {
    detector: Arc<dyn PiiDetector>,
    stats: StatsTracker,
    audit: AuditLogger,
}

impl PiiProcessor {
    /// Create a processor without an audit trail
    pub fn new(detector: Arc<dyn PiiDetector>) -> Self {
        Self {
            detector,
            stats: StatsTracker::new(),
            audit: AuditLogger::disabled(),
        }
    }

    /// Record every processed document in `audit`
    pub fn with_audit(mut self, audit: AuditLogger) -> Self {
        self.audit = audit;
        self
    }

    /// Detect and anonymize PII in `text`
    ///
    /// The anonymized text always uses label placeholders; other modes are
    /// rendered on demand with [`render`]. Statistics are updated on every
    /// call, so processing the same text twice counts it twice.
    ///
    /// # Errors
    ///
    /// Returns an anonymization error if the detector produced spans that do
    /// not fit `text`. Recognizer failures never surface here.
    pub async fn process(&self, text: &str, config: &DetectorConfig) -> Result<DetectionResult> {
        let started = Instant::now();

        let outcome = self.detector.detect(text, config).await;
        let anonymized = anonymize(text, &outcome.detections, AnonymizationMode::Label)?;
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        let result = DetectionResult::new(
            text.to_string(),
            anonymized,
            outcome.detections,
            outcome.backend,
            elapsed_ms,
        );

        self.stats.record(&result).await;
        if let Err(e) = self.audit.log_result(&result) {
            tracing::warn!(error = %e, document_id = %result.id, "Failed to write audit entry");
        }
        log_detection_summary!(&result);

        Ok(result)
    }

    /// Snapshot of the statistics record
    pub async fn stats(&self) -> ProcessingStats {
        self.stats.snapshot().await
    }

    /// Zero the statistics record
    pub async fn reset_stats(&self) {
        self.stats.reset().await;
    }

    /// Status of the detector's NER backend
    pub fn backend_status(&self) -> BackendStatus {
        self.detector.status()
    }
}

/// Re-render a result's text with another substitution style
pub fn render(result: &DetectionResult, mode: AnonymizationMode) -> Result<String> {
    Ok(anonymize(&result.original_text, &result.detections, mode)?)
}
