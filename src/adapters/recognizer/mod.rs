//! Token-classification recognizer adapters
//!
//! The NER model is consumed as an opaque capability: text goes in, scored
//! entity spans come out. [`EntityRecognizer`] is the seam; [`HttpRecognizer`]
//! speaks the Hugging Face inference protocol and test code plugs in stubs.

pub mod factory;
pub mod http;

use crate::config::{OffsetUnit, RecognizerConfig};
use crate::domain::RecognizerError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use factory::create_recognizer;
pub use http::HttpRecognizer;

/// One entity span as reported by the model
///
/// Aggregated pipelines report `entity_group`, token-level ones `entity`;
/// offsets are optional in the protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSpan {
    /// Aggregated entity label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_group: Option<String>,

    /// Token-level entity label (BIO tagged)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,

    /// Matched text as seen by the model
    #[serde(default)]
    pub word: String,

    /// Start offset
    #[serde(default)]
    pub start: Option<usize>,

    /// End offset
    #[serde(default)]
    pub end: Option<usize>,

    /// Model score
    pub score: f32,
}

impl RawSpan {
    /// Label of the span, preferring the aggregated one
    pub fn label(&self) -> &str {
        self.entity_group
            .as_deref()
            .or(self.entity.as_deref())
            .unwrap_or_default()
    }
}

/// Request parameters forwarded to the model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecognitionOptions {
    /// Span aggregation strategy
    pub aggregation_strategy: String,
    /// Labels the model should not report
    pub ignore_labels: Vec<String>,
}

impl Default for RecognitionOptions {
    fn default() -> Self {
        Self {
            aggregation_strategy: "simple".to_string(),
            ignore_labels: vec!["O".to_string()],
        }
    }
}

impl From<&RecognizerConfig> for RecognitionOptions {
    fn from(config: &RecognizerConfig) -> Self {
        Self {
            aggregation_strategy: config.aggregation_strategy.clone(),
            ignore_labels: config.ignore_labels.clone(),
        }
    }
}

/// Trait for NER backends
#[async_trait]
pub trait EntityRecognizer: Send + Sync {
    /// Prepare the backend; called once per session
    ///
    /// # Errors
    ///
    /// Any error leaves the session in fallback mode for good.
    async fn load(&self) -> Result<(), RecognizerError>;

    /// Recognize entities in `text`
    async fn recognize(
        &self,
        text: &str,
        options: &RecognitionOptions,
    ) -> Result<Vec<RawSpan>, RecognizerError>;

    /// Unit of the offsets in returned spans
    fn offset_unit(&self) -> OffsetUnit {
        OffsetUnit::Chars
    }
}
