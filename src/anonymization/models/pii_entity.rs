//! PII entity data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// PII type enumeration
///
/// This is the closed set of types the detector reports. Serialized in
/// camelCase (`creditCard`, `ipAddress`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PiiType {
    /// Email addresses
    Email,
    /// Telephone numbers
    Phone,
    /// Social Security Numbers
    Ssn,
    /// Payment card numbers
    CreditCard,
    /// Person names
    Name,
    /// Street addresses and locations
    Address,
    /// IPv4 addresses
    IpAddress,
    /// Dates of birth (and other date/time entities reported by the model)
    DateOfBirth,
    /// Passport numbers
    Passport,
    /// Anything the model reports with a label outside the mapping table
    Custom,
}

impl PiiType {
    /// Every PII type, in declaration order
    pub const ALL: [PiiType; 10] = [
        Self::Email,
        Self::Phone,
        Self::Ssn,
        Self::CreditCard,
        Self::Name,
        Self::Address,
        Self::IpAddress,
        Self::DateOfBirth,
        Self::Passport,
        Self::Custom,
    ];

    /// Tag used in configuration files and serialized output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Ssn => "ssn",
            Self::CreditCard => "creditCard",
            Self::Name => "name",
            Self::Address => "address",
            Self::IpAddress => "ipAddress",
            Self::DateOfBirth => "dateOfBirth",
            Self::Passport => "passport",
            Self::Custom => "custom",
        }
    }

    /// Display tag used inside placeholders (`[EMAIL_2]`)
    pub fn placeholder_name(&self) -> &'static str {
        match self {
            Self::Name => "NAME",
            Self::Email => "EMAIL",
            Self::Phone => "PHONE",
            Self::CreditCard => "CREDIT_CARD",
            Self::Ssn => "SSN",
            Self::Address => "ADDRESS",
            Self::IpAddress => "IP_ADDRESS",
            Self::DateOfBirth => "DATE_OF_BIRTH",
            Self::Passport => "PASSPORT",
            Self::Custom => "CUSTOM",
        }
    }
}

/// Placeholder name for a type tag that may not be a known [`PiiType`]
pub fn placeholder_name_for_tag(tag: &str) -> &'static str {
    tag.parse::<PiiType>()
        .map(|t| t.placeholder_name())
        .unwrap_or("UNKNOWN")
}

impl fmt::Display for PiiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PiiType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept camelCase, snake_case and SCREAMING_SNAKE_CASE spellings
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            "ssn" => Ok(Self::Ssn),
            "creditcard" => Ok(Self::CreditCard),
            "name" => Ok(Self::Name),
            "address" => Ok(Self::Address),
            "ipaddress" => Ok(Self::IpAddress),
            "dateofbirth" => Ok(Self::DateOfBirth),
            "passport" => Ok(Self::Passport),
            "custom" => Ok(Self::Custom),
            _ => Err(format!("Unknown PII type: {s}")),
        }
    }
}

/// Detection method used to identify PII
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    /// Named Entity Recognition model
    Ner,
    /// Regex pattern matching (fallback)
    Regex,
}

/// Backend that produced the detections of one processing run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionBackend {
    /// NER model through the recognizer adapter
    Ner,
    /// Regex fallback matcher
    Fallback,
}

impl DetectionBackend {
    /// Static quality indicator of the backend
    pub fn accuracy(&self) -> f64 {
        match self {
            Self::Ner => 0.9827,
            Self::Fallback => 0.85,
        }
    }
}

/// One detected PII occurrence
///
/// `start` and `end` are byte offsets into the original text and always fall
/// on character boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    /// PII type
    #[serde(rename = "type")]
    pub pii_type: PiiType,
    /// Matched substring
    pub text: String,
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
    /// Confidence score (0.0 - 1.0)
    pub confidence: f32,
    /// Matched substring before any rewriting
    pub original_text: String,
    /// Detection method used
    pub detection_method: DetectionMethod,
}

impl Detection {
    /// Create a new detection for `text[start..end]`
    pub fn new(
        pii_type: PiiType,
        text: impl Into<String>,
        start: usize,
        end: usize,
        detection_method: DetectionMethod,
    ) -> Self {
        let text = text.into();
        Self {
            pii_type,
            original_text: text.clone(),
            text,
            start,
            end,
            confidence: 1.0,
            detection_method,
        }
    }

    /// Set the confidence score
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.set_confidence(confidence);
        self
    }

    /// Set the confidence score
    pub fn set_confidence(&mut self, confidence: f32) {
        self.confidence = confidence.clamp(0.0, 1.0);
    }

    /// Length of the span in bytes
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether two spans share at least one byte
    pub fn overlaps(&self, other: &Detection) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Output of one processing run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    /// Unique id of the run
    pub id: Uuid,
    /// Input text
    pub original_text: String,
    /// Text with every detection replaced by its placeholder
    pub anonymized_text: String,
    /// Detections in recognizer order
    pub detections: Vec<Detection>,
    /// Wall-clock processing time in milliseconds
    pub processing_time: f64,
    /// Static quality indicator of the backend used
    pub accuracy: f64,
    /// Backend that produced the detections
    pub backend: DetectionBackend,
    /// When the run completed
    pub timestamp: DateTime<Utc>,
}

impl DetectionResult {
    /// Create a new detection result
    pub fn new(
        original_text: String,
        anonymized_text: String,
        detections: Vec<Detection>,
        backend: DetectionBackend,
        processing_time: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            original_text,
            anonymized_text,
            detections,
            processing_time,
            accuracy: backend.accuracy(),
            backend,
            timestamp: Utc::now(),
        }
    }

    /// Get total number of detections
    pub fn total_detections(&self) -> usize {
        self.detections.len()
    }

    /// Check if any PII was detected
    pub fn has_detections(&self) -> bool {
        !self.detections.is_empty()
    }

    /// Detection counts by type
    pub fn counts_by_type(&self) -> BTreeMap<PiiType, usize> {
        let mut counts = BTreeMap::new();
        for detection in &self.detections {
            *counts.entry(detection.pii_type).or_insert(0) += 1;
        }
        counts
    }

    /// Mean confidence of the detections, if any
    pub fn mean_confidence(&self) -> Option<f64> {
        if self.detections.is_empty() {
            return None;
        }
        let total: f64 = self.detections.iter().map(|d| d.confidence as f64).sum();
        Some(total / self.detections.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pii_type_serde_tags() {
        let json = serde_json::to_string(&PiiType::CreditCard).unwrap();
        assert_eq!(json, "\"creditCard\"");
        let parsed: PiiType = serde_json::from_str("\"ipAddress\"").unwrap();
        assert_eq!(parsed, PiiType::IpAddress);
        for pii_type in PiiType::ALL {
            let json = serde_json::to_string(&pii_type).unwrap();
            assert_eq!(json, format!("\"{}\"", pii_type.as_str()));
        }
    }

    #[test]
    fn test_pii_type_from_str_spellings() {
        assert_eq!("creditCard".parse::<PiiType>().unwrap(), PiiType::CreditCard);
        assert_eq!("credit_card".parse::<PiiType>().unwrap(), PiiType::CreditCard);
        assert_eq!("DATE_OF_BIRTH".parse::<PiiType>().unwrap(), PiiType::DateOfBirth);
        assert!("driverLicense".parse::<PiiType>().is_err());
    }

    #[test]
    fn test_placeholder_names() {
        assert_eq!(PiiType::Name.placeholder_name(), "NAME");
        assert_eq!(PiiType::CreditCard.placeholder_name(), "CREDIT_CARD");
        assert_eq!(PiiType::DateOfBirth.placeholder_name(), "DATE_OF_BIRTH");
        assert_eq!(placeholder_name_for_tag("ipAddress"), "IP_ADDRESS");
        assert_eq!(placeholder_name_for_tag("driverLicense"), "UNKNOWN");
    }

    #[test]
    fn test_detection_serializes_type_field() {
        let detection = Detection::new(PiiType::Email, "a@b.io", 3, 9, DetectionMethod::Regex)
            .with_confidence(0.95);
        let value = serde_json::to_value(&detection).unwrap();
        assert_eq!(value["type"], "email");
        assert_eq!(value["originalText"], "a@b.io");
        assert_eq!(value["start"], 3);
        assert_eq!(value["end"], 9);
    }

    #[test]
    fn test_confidence_is_clamped() {
        let detection =
            Detection::new(PiiType::Phone, "555", 0, 3, DetectionMethod::Ner).with_confidence(1.7);
        assert_eq!(detection.confidence, 1.0);
    }

    #[test]
    fn test_overlaps() {
        let a = Detection::new(PiiType::Phone, "x", 0, 5, DetectionMethod::Regex);
        let b = Detection::new(PiiType::Ssn, "y", 4, 8, DetectionMethod::Regex);
        let c = Detection::new(PiiType::Ssn, "z", 5, 8, DetectionMethod::Regex);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_result_accuracy_follows_backend() {
        let ner = DetectionResult::new(String::new(), String::new(), vec![], DetectionBackend::Ner, 1.0);
        let fallback = DetectionResult::new(
            String::new(),
            String::new(),
            vec![],
            DetectionBackend::Fallback,
            1.0,
        );
        assert_eq!(ner.accuracy, 0.9827);
        assert_eq!(fallback.accuracy, 0.85);
        assert!(ner.mean_confidence().is_none());
    }

    #[test]
    fn test_counts_by_type() {
        let detections = vec![
            Detection::new(PiiType::Email, "a@b.io", 0, 6, DetectionMethod::Regex),
            Detection::new(PiiType::Email, "c@d.io", 10, 16, DetectionMethod::Regex),
            Detection::new(PiiType::Name, "Ann Lee", 20, 27, DetectionMethod::Regex),
        ];
        let result = DetectionResult::new(
            String::new(),
            String::new(),
            detections,
            DetectionBackend::Fallback,
            0.5,
        );
        let counts = result.counts_by_type();
        assert_eq!(counts.get(&PiiType::Email), Some(&2));
        assert_eq!(counts.get(&PiiType::Name), Some(&1));
    }
}
