//! PII detection module
//!
//! Provides the trait-based detection interface and its implementations:
//! the regex fallback ([`RegexDetector`]) and the NER-first detector with
//! transparent fallback ([`HybridDetector`]).

pub mod hybrid;
pub mod labels;
pub mod ner;
pub mod overlap;
pub mod patterns;
pub mod regex;

use crate::anonymization::config::DetectorConfig;
use crate::anonymization::models::{Detection, DetectionBackend};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use self::regex::RegexDetector;
pub use hybrid::HybridDetector;
pub use ner::NerDetector;

/// Availability of the NER backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendStatus {
    /// Initialization is still running; calls use the fallback
    Initializing,
    /// NER backend is serving calls
    Ready,
    /// NER backend is disabled or failed to initialize
    Fallback,
}

impl BackendStatus {
    /// Whether calls go to the NER backend
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl fmt::Display for BackendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initializing => write!(f, "Initializing"),
            Self::Ready => write!(f, "Loaded"),
            Self::Fallback => write!(f, "Fallback Mode"),
        }
    }
}

/// Detections of one call and the backend that produced them
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionOutcome {
    /// Accepted detections
    pub detections: Vec<Detection>,
    /// Backend actually used
    pub backend: DetectionBackend,
}

/// Trait for PII detection implementations
///
/// Detection never fails: backend errors are absorbed by the implementation.
#[async_trait]
pub trait PiiDetector: Send + Sync {
    /// Detect PII in `text`, keeping only what `config` accepts
    async fn detect(&self, text: &str, config: &DetectorConfig) -> DetectionOutcome;

    /// Current backend status
    fn status(&self) -> BackendStatus;
}
