//! External system integrations for Veil.
//!
//! - [`recognizer`] - NER token-classification backends
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies
//! and enable testing with stub implementations. The recognizer is consumed
//! through the [`recognizer::EntityRecognizer`] trait:
//!
//! ```rust,no_run
//! use veil::adapters::recognizer::create_recognizer;
//! use veil::config::RecognizerConfig;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RecognizerConfig {
//!     enabled: true,
//!     endpoint: "http://localhost:8080/predict".to_string(),
//!     ..RecognizerConfig::default()
//! };
//!
//! let recognizer = create_recognizer(&config)?;
//! assert!(recognizer.is_some());
//! # Ok(())
//! # }
//! ```

pub mod recognizer;
