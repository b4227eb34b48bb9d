//! Regex-based fallback detector

use super::overlap::resolve_overlaps;
use super::{patterns::PatternRegistry, BackendStatus, DetectionOutcome, PiiDetector};
use crate::anonymization::config::DetectorConfig;
use crate::anonymization::models::{Detection, DetectionBackend, DetectionMethod};
use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// Regex-based PII detector
///
/// Used on its own when no recognizer is configured, and as the fallback
/// path of [`HybridDetector`](super::HybridDetector). Matching is pure: the
/// same text always yields the same detections.
#[derive(Debug, Clone)]
pub struct RegexDetector {
    pattern_registry: Arc<PatternRegistry>,
}

impl RegexDetector {
    /// Create a new regex detector with the built-in patterns
    pub fn new() -> Result<Self> {
        let registry = PatternRegistry::default_patterns()?;
        Ok(Self::with_registry(registry))
    }

    /// Create a detector from an optional pattern library file
    pub fn from_library(path: Option<&Path>) -> Result<Self> {
        Ok(Self::with_registry(PatternRegistry::load(path)?))
    }

    /// Create a new regex detector with custom pattern registry
    pub fn with_registry(registry: PatternRegistry) -> Self {
        Self {
            pattern_registry: Arc::new(registry),
        }
    }

    /// Every match of every pattern, unfiltered and possibly overlapping
    pub fn scan(&self, text: &str) -> Vec<Detection> {
        let mut detections = Vec::new();

        for pattern in self.pattern_registry.all_patterns() {
            for matched in pattern.regex.find_iter(text) {
                let detection = Detection::new(
                    pattern.pii_type,
                    matched.as_str(),
                    matched.start(),
                    matched.end(),
                    DetectionMethod::Regex,
                )
                .with_confidence(pattern.confidence);
                detections.push(detection);
            }
        }

        detections
    }

    /// Matches accepted by `config`, overlap-free and ordered left to right
    ///
    /// Filtering happens before overlap resolution so that a disabled type
    /// can never shadow an enabled one.
    pub fn match_text(&self, text: &str, config: &DetectorConfig) -> Vec<Detection> {
        let accepted: Vec<Detection> = self
            .scan(text)
            .into_iter()
            .filter(|d| config.accepts(d.pii_type, d.confidence))
            .collect();

        resolve_overlaps(accepted)
    }
}

#[async_trait]
impl PiiDetector for RegexDetector {
    async fn detect(&self, text: &str, config: &DetectorConfig) -> DetectionOutcome {
        DetectionOutcome {
            detections: self.match_text(text, config),
            backend: DetectionBackend::Fallback,
        }
    }

    fn status(&self) -> BackendStatus {
        BackendStatus::Fallback
    }
}
