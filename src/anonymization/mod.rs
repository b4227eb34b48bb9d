//! PII detection and anonymization
//!
//! # Architecture
//!
//! The pipeline consists of:
//! - **Detection**: NER recognizer with a regex fallback ([`detector`])
//! - **Anonymization**: right-to-left span substitution with stable
//!   per-type placeholders ([`engine`], [`anonymizer`])
//! - **Audit**: structured log of every run with hashed PII values ([`audit`])
//! - **Reporting**: multi-document scan summaries ([`report`])
//!
//! # Usage
//!
//! ```rust
//! use veil::anonymization::config::{AnonymizationMode, DetectorConfig};
//! use veil::anonymization::detector::RegexDetector;
//! use veil::anonymization::engine::anonymize;
//!
//! let detector = RegexDetector::new()?;
//! let text = "Reach me at jane@example.com";
//! let detections = detector.match_text(text, &DetectorConfig::default());
//!
//! let output = anonymize(text, &detections, AnonymizationMode::Label)?;
//! assert_eq!(output, "Reach me at [EMAIL]");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod anonymizer;
pub mod audit;
pub mod config;
pub mod detector;
pub mod engine;
pub mod models;
pub mod report;

pub use config::{AnonymizationMode, DetectorConfig, DetectorConfigUpdate};
pub use engine::anonymize;
pub use models::{Detection, DetectionBackend, DetectionMethod, DetectionResult, PiiType};
pub use report::ScanSummary;
