//! Core business logic for Veil.
//!
//! This module ties detection and anonymization together into per-document
//! processing and a stateful session.
//!
//! # Modules
//!
//! - [`processing`] - Result aggregation and cumulative statistics
//! - [`session`] - Active configuration, result history and exports
//!
//! # Processing Workflow
//!
//! 1. **Detect**: Ask the NER backend, or the pattern fallback when it is
//!    not ready or the call fails
//! 2. **Filter**: Drop detections below the threshold or of disabled types
//! 3. **Anonymize**: Splice `[TYPE]` / `[TYPE_N]` placeholders right to left
//! 4. **Record**: Update statistics, history and the audit trail
//! 5. **Export** (optional): Render the current result as JSON, CSV or text
//!
//! # Example
//!
//! ```rust,no_run
//! use veil::config::load_config;
//! use veil::core::session::{ExportFormat, Session};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("veil.toml")?;
//! let mut session = Session::start(&config).await?;
//!
//! let result = session.process_text("Contact John Smith at john@example.com").await?;
//! println!("{}", result.anonymized_text);
//!
//! let export = session.export(ExportFormat::Csv).await?;
//! println!("{}", export.filename);
//! # Ok(())
//! # }
//! ```

pub mod processing;
pub mod session;
