//! Detection session
//!
//! A [`Session`] is the stateful front of the pipeline: it holds the active
//! detector configuration, the result of the last call and a bounded history
//! of earlier results, and it renders exports of the current result.

use super::export::{render_export, ExportArtifact, ExportFormat};
use crate::adapters::recognizer::{create_recognizer, RecognitionOptions};
use crate::anonymization::audit::AuditLogger;
use crate::anonymization::config::{DetectorConfig, DetectorConfigUpdate};
use crate::anonymization::detector::{
    BackendStatus, HybridDetector, NerDetector, PiiDetector, RegexDetector,
};
use crate::anonymization::models::{DetectionBackend, DetectionResult};
use crate::config::VeilConfig;
use crate::core::processing::{PiiProcessor, ProcessingStats};
use crate::domain::{ExportError, Result, VeilError};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;

/// Results kept in the history
pub const HISTORY_LIMIT: usize = 50;

/// Entity types the NER model distinguishes
pub const SUPPORTED_ENTITY_TYPES: usize = 17;

const DEFAULT_MODEL_NAME: &str = "Piiranha v1";
const DEFAULT_MODEL_VERSION: &str = "1.0.0";

/// Description of the detection model in use
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    /// Model name
    pub name: String,
    /// Model version
    pub version: String,
    /// Accuracy of the active backend, e.g. `98.27%`
    pub accuracy: String,
    /// Backend status, e.g. `Loaded`
    pub status: String,
    /// Entity types the model distinguishes
    pub pii_types: usize,
}

/// Stateful detection session
pub struct Session {
    config: DetectorConfig,
    detector: Arc<HybridDetector>,
    processor: PiiProcessor,
    model_name: String,
    model_version: String,
    current: Option<DetectionResult>,
    history: VecDeque<DetectionResult>,
}

impl Session {
    /// Create a session over an existing detector
    ///
    /// The detector's backend initialization is not started; see
    /// [`Session::start`].
    pub fn new(detector: Arc<HybridDetector>, config: DetectorConfig) -> Self {
        let shared: Arc<dyn PiiDetector> = detector.clone();
        let processor = PiiProcessor::new(shared);
        Self {
            config,
            detector,
            processor,
            model_name: DEFAULT_MODEL_NAME.to_string(),
            model_version: DEFAULT_MODEL_VERSION.to_string(),
            current: None,
            history: VecDeque::with_capacity(HISTORY_LIMIT),
        }
    }

    /// Record every processed document in `audit`
    pub fn with_audit(mut self, audit: AuditLogger) -> Self {
        self.processor = self.processor.with_audit(audit);
        self
    }

    /// Name and version reported by [`Session::model_info`]
    pub fn with_model(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.model_name = name.into();
        self.model_version = version.into();
        self
    }

    /// Build a session from configuration and start backend initialization
    ///
    /// Initialization runs in the background; calls made before it settles
    /// use the pattern fallback.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the pattern library, the recognizer
    /// client or the audit log cannot be set up
    pub async fn start(config: &VeilConfig) -> Result<Self> {
        let fallback = RegexDetector::from_library(config.detector.pattern_library.as_deref())
            .map_err(|e| VeilError::Configuration(format!("{e:#}")))?;

        let ner = create_recognizer(&config.recognizer)?.map(|recognizer| {
            NerDetector::new(recognizer, RecognitionOptions::from(&config.recognizer))
        });

        let audit = AuditLogger::from_config(&config.audit)
            .map_err(|e| VeilError::Configuration(format!("{e:#}")))?;

        let detector = Arc::new(HybridDetector::new(ner, fallback));
        detector.initialize();

        Ok(Self::new(detector, config.detector.clone())
            .with_audit(audit)
            .with_model(
                config.recognizer.model_name.clone(),
                config.recognizer.model_version.clone(),
            ))
    }

    /// Process `text` with the active configuration
    ///
    /// The result becomes the current result and is pushed onto the front
    /// of the history, evicting the oldest entry beyond [`HISTORY_LIMIT`].
    pub async fn process_text(&mut self, text: &str) -> Result<&DetectionResult> {
        let result = self.processor.process(text, &self.config).await?;

        self.history.push_front(result.clone());
        self.history.truncate(HISTORY_LIMIT);

        Ok(self.current.insert(result))
    }

    /// Merge `update` into the active configuration
    pub fn update_config(&mut self, update: DetectorConfigUpdate) {
        self.config.apply(update);
        tracing::debug!(
            types = self.config.types.len(),
            threshold = self.config.confidence_threshold,
            mode = %self.config.mode,
            "Detector configuration updated"
        );
    }

    /// Active configuration
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Result of the last call, if any
    pub fn current_result(&self) -> Option<&DetectionResult> {
        self.current.as_ref()
    }

    /// Earlier results, most recent first
    pub fn history(&self) -> impl Iterator<Item = &DetectionResult> {
        self.history.iter()
    }

    /// Forget the history; the current result is kept
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Statistics since the last reset
    pub async fn stats(&self) -> ProcessingStats {
        self.processor.stats().await
    }

    /// Zero the statistics
    pub async fn reset_stats(&self) {
        self.processor.reset_stats().await;
    }

    /// Export the current result
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::NoResult`] before the first call
    pub async fn export(
        &self,
        format: ExportFormat,
    ) -> std::result::Result<ExportArtifact, ExportError> {
        let result = self.current.as_ref().ok_or(ExportError::NoResult)?;
        let stats = self.processor.stats().await;
        let artifact = render_export(result, &stats, format, Utc::now())?;

        tracing::info!(
            format = %format,
            filename = %artifact.filename,
            bytes = artifact.content.len(),
            "Exported result"
        );
        Ok(artifact)
    }

    /// Status of the NER backend
    pub fn backend_status(&self) -> BackendStatus {
        self.processor.backend_status()
    }

    /// Wait for backend initialization to settle
    pub async fn wait_until_initialized(&self) -> BackendStatus {
        self.detector.wait_until_initialized().await
    }

    /// Describe the model in use
    pub fn model_info(&self) -> ModelInfo {
        let status = self.backend_status();
        let accuracy = if status.is_ready() {
            format!("{:.2}%", DetectionBackend::Ner.accuracy() * 100.0)
        } else {
            format!(
                "{:.0}% (Fallback)",
                DetectionBackend::Fallback.accuracy() * 100.0
            )
        };

        ModelInfo {
            name: self.model_name.clone(),
            version: self.model_version.clone(),
            accuracy,
            status: status.to_string(),
            pii_types: SUPPORTED_ENTITY_TYPES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::config::AnonymizationMode;
    use crate::anonymization::models::PiiType;

    fn session() -> Session {
        let detector = HybridDetector::new(None, RegexDetector::new().unwrap());
        Session::new(Arc::new(detector), DetectorConfig::default())
    }

    #[tokio::test]
    async fn test_process_sets_current_and_history() {
        let mut session = session();
        assert!(session.current_result().is_none());

        session.process_text("first a@x.io").await.unwrap();
        session.process_text("second b@y.io").await.unwrap();

        let current = session.current_result().unwrap();
        assert_eq!(current.original_text, "second b@y.io");

        let history: Vec<_> = session.history().map(|r| r.original_text.as_str()).collect();
        assert_eq!(history, vec!["second b@y.io", "first a@x.io"]);
    }

    #[tokio::test]
    async fn test_history_is_capped() {
        let mut session = session();
        for i in 0..(HISTORY_LIMIT + 5) {
            session.process_text(&format!("doc {i}")).await.unwrap();
        }

        assert_eq!(session.history().count(), HISTORY_LIMIT);
        assert_eq!(
            session.history().next().unwrap().original_text,
            format!("doc {}", HISTORY_LIMIT + 4)
        );
        assert_eq!(session.history().last().unwrap().original_text, "doc 5");
    }

    #[tokio::test]
    async fn test_clear_history_keeps_current() {
        let mut session = session();
        session.process_text("a@x.io").await.unwrap();
        session.clear_history();

        assert_eq!(session.history().count(), 0);
        assert!(session.current_result().is_some());
    }

    #[tokio::test]
    async fn test_update_config_applies_to_next_call() {
        let mut session = session();
        session.update_config(DetectorConfigUpdate {
            types: Some([PiiType::Phone].into_iter().collect()),
            mode: Some(AnonymizationMode::Remove),
            ..DetectorConfigUpdate::default()
        });

        assert_eq!(session.config().mode, AnonymizationMode::Remove);
        assert!((session.config().confidence_threshold - 0.8).abs() < f32::EPSILON);

        let result = session.process_text("mail a@x.io").await.unwrap();
        assert!(result.detections.is_empty());
    }

    #[tokio::test]
    async fn test_export_requires_result() {
        let session = session();
        assert!(matches!(
            session.export(ExportFormat::Txt).await,
            Err(ExportError::NoResult)
        ));
    }

    #[tokio::test]
    async fn test_export_current_result() {
        let mut session = session();
        session.process_text("mail a@x.io").await.unwrap();

        let artifact = session.export(ExportFormat::Txt).await.unwrap();
        assert_eq!(artifact.content, "mail [EMAIL]");

        let artifact = session.export(ExportFormat::Json).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&artifact.content).unwrap();
        assert_eq!(value["stats"]["totalDocuments"], 1);
    }

    #[tokio::test]
    async fn test_reset_stats() {
        let mut session = session();
        session.process_text("a@x.io").await.unwrap();
        session.reset_stats().await;
        assert_eq!(session.stats().await.total_documents, 0);
    }

    #[test]
    fn test_model_info_in_fallback() {
        let info = session().model_info();
        assert_eq!(info.name, "Piiranha v1");
        assert_eq!(info.version, "1.0.0");
        assert_eq!(info.accuracy, "85% (Fallback)");
        assert_eq!(info.status, "Fallback Mode");
        assert_eq!(info.pii_types, 17);
    }

    #[tokio::test]
    async fn test_start_without_recognizer() {
        let config = VeilConfig::default();
        let session = Session::start(&config).await.unwrap();
        assert_eq!(session.wait_until_initialized().await, BackendStatus::Fallback);
    }
}
