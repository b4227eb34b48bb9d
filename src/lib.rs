// Veil - PII Detection and Anonymization
// Copyright (c) 2025 Veil Contributors
// Licensed under the MIT License

//! # Veil - PII Detection and Anonymization
//!
//! Veil finds personally identifiable information in free text and rewrites
//! the text so that it can be shared safely.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Detecting** PII with a NER model behind an HTTP inference endpoint
//! - **Falling back** to a regex pattern library whenever the model is
//!   unavailable, still loading, or fails a call
//! - **Anonymizing** text with stable per-type placeholders
//!   (`[EMAIL_1]`, `[EMAIL_2]`), masks, or removal
//! - **Tracking** statistics, history and an audit trail, and exporting
//!   results as JSON, CSV or text
//!
//! ## Architecture
//!
//! Veil follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (processing, statistics, session, export)
//! - [`anonymization`] - Detection backends and the anonymization engine
//! - [`adapters`] - External integrations (NER inference endpoint)
//! - [`domain`] - Error and result types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use veil::config::load_config;
//! use veil::core::session::Session;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("veil.toml")?;
//!     let mut session = Session::start(&config).await?;
//!
//!     let result = session
//!         .process_text("Contact John Smith at john.doe@email.com or jane@x.com.")
//!         .await?;
//!
//!     // "Contact [NAME] at [EMAIL_1] or [EMAIL_2]."
//!     println!("{}", result.anonymized_text);
//!     Ok(())
//! }
//! ```
//!
//! ## Anonymization
//!
//! Detections are spliced right to left so earlier offsets stay valid.
//! Placeholders are numbered per type in order of appearance, and only
//! when a type occurs more than once:
//!
//! ```rust
//! use veil::anonymization::{anonymize, AnonymizationMode, Detection, DetectionMethod, PiiType};
//!
//! let text = "a@x.io and b@y.io";
//! let detections = vec![
//!     Detection::new(PiiType::Email, "b@y.io", 11, 17, DetectionMethod::Regex),
//!     Detection::new(PiiType::Email, "a@x.io", 0, 6, DetectionMethod::Regex),
//! ];
//!
//! let labeled = anonymize(text, &detections, AnonymizationMode::Label)?;
//! assert_eq!(labeled, "[EMAIL_1] and [EMAIL_2]");
//!
//! let masked = anonymize(text, &detections, AnonymizationMode::Mask)?;
//! assert_eq!(masked, "****** and ******");
//! # Ok::<(), veil::domain::AnonymizationError>(())
//! ```
//!
//! ## Error Handling
//!
//! Veil uses the [`domain::VeilError`] type for all errors:
//!
//! ```rust,no_run
//! use veil::domain::VeilError;
//!
//! fn example() -> Result<(), VeilError> {
//!     // Errors are automatically converted using the ? operator
//!     let config = veil::config::load_config("veil.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! Recognizer failures are not errors for the caller: detection falls back
//! to patterns and the backend status reports the downgrade.
//!
//! ## Logging
//!
//! Veil uses structured logging with the `tracing` crate. Log fields carry
//! types, counts, offsets and timings, never the matched values.

pub mod adapters;
pub mod anonymization;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
