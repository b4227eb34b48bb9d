//! NER-based detector
//!
//! Turns the raw spans of an [`EntityRecognizer`] into [`Detection`]s:
//! scores below the threshold are discarded, labels are mapped onto
//! [`PiiType`](crate::anonymization::models::PiiType), disabled types are
//! discarded and offsets are normalized to byte offsets into the input.

use super::labels::map_label;
use crate::adapters::recognizer::{EntityRecognizer, RawSpan, RecognitionOptions};
use crate::anonymization::config::DetectorConfig;
use crate::anonymization::models::{Detection, DetectionMethod};
use crate::config::OffsetUnit;
use crate::domain::RecognizerError;
use std::sync::Arc;

/// Detector backed by a NER recognizer
#[derive(Clone)]
pub struct NerDetector {
    recognizer: Arc<dyn EntityRecognizer>,
    options: RecognitionOptions,
}

impl NerDetector {
    /// Create a detector over `recognizer`
    pub fn new(recognizer: Arc<dyn EntityRecognizer>, options: RecognitionOptions) -> Self {
        Self {
            recognizer,
            options,
        }
    }

    /// Initialize the underlying recognizer
    pub async fn load(&self) -> Result<(), RecognizerError> {
        self.recognizer.load().await
    }

    /// Detections accepted by `config`, in recognizer order
    ///
    /// # Errors
    ///
    /// Returns the recognizer's error unchanged; the caller decides how to
    /// fall back.
    pub async fn detect(
        &self,
        text: &str,
        config: &DetectorConfig,
    ) -> Result<Vec<Detection>, RecognizerError> {
        let spans = self.recognizer.recognize(text, &self.options).await?;
        Ok(normalize_spans(
            text,
            spans,
            self.recognizer.offset_unit(),
            config,
        ))
    }
}

/// Convert raw recognizer spans into detections over `text`
///
/// Spans without offsets are located by searching for their `word`, first
/// after the previous span and then from the start of the text. Spans that
/// cannot be placed on valid character boundaries are dropped.
pub fn normalize_spans(
    text: &str,
    spans: Vec<RawSpan>,
    unit: OffsetUnit,
    config: &DetectorConfig,
) -> Vec<Detection> {
    let char_starts: Option<Vec<usize>> = match unit {
        OffsetUnit::Chars => Some(
            text.char_indices()
                .map(|(i, _)| i)
                .chain(std::iter::once(text.len()))
                .collect(),
        ),
        OffsetUnit::Bytes => None,
    };

    let mut detections = Vec::with_capacity(spans.len());
    let mut cursor = 0;

    for span in spans {
        if span.score < config.confidence_threshold {
            continue;
        }

        let pii_type = map_label(span.label());
        if !config.is_enabled(pii_type) {
            continue;
        }

        let located = match (span.start, span.end) {
            (Some(start), Some(end)) => to_byte_range(text, start, end, char_starts.as_deref()),
            _ => locate_word(text, &span.word, cursor),
        };

        let Some((start, end)) = located else {
            tracing::warn!(
                label = %span.label(),
                start = ?span.start,
                end = ?span.end,
                "Dropping recognizer span that does not fit the input text"
            );
            continue;
        };

        detections.push(
            Detection::new(pii_type, &text[start..end], start, end, DetectionMethod::Ner)
                .with_confidence(span.score),
        );
        cursor = end;
    }

    detections
}

fn to_byte_range(
    text: &str,
    start: usize,
    end: usize,
    char_starts: Option<&[usize]>,
) -> Option<(usize, usize)> {
    let (start, end) = match char_starts {
        Some(starts) => (*starts.get(start)?, *starts.get(end)?),
        None => (start, end),
    };

    let valid = start < end
        && end <= text.len()
        && text.is_char_boundary(start)
        && text.is_char_boundary(end);
    valid.then_some((start, end))
}

fn locate_word(text: &str, word: &str, cursor: usize) -> Option<(usize, usize)> {
    let word = word.trim();
    if word.is_empty() {
        return None;
    }

    let start = text
        .get(cursor..)
        .and_then(|rest| rest.find(word))
        .map(|offset| cursor + offset)
        .or_else(|| text.find(word))?;

    Some((start, start + word.len()))
}
