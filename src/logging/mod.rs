//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Configurable log levels with `RUST_LOG` override
//! - JSON-formatted file logs with rotation
//!
//! Log fields carry types, counts, offsets and timings. Matched PII values
//! are never logged.
//!
//! # Example
//!
//! ```no_run
//! use veil::logging::init_logging;
//! use veil::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the outcome of one processing run
///
/// # Example
///
/// ```no_run
/// use veil::log_detection_summary;
/// use veil::anonymization::models::{DetectionBackend, DetectionResult};
///
/// let result = DetectionResult::new(
///     "text".to_string(),
///     "text".to_string(),
///     vec![],
///     DetectionBackend::Fallback,
///     0.4,
/// );
/// log_detection_summary!(&result);
/// ```
#[macro_export]
macro_rules! log_detection_summary {
    ($result:expr) => {
        tracing::info!(
            document_id = %$result.id,
            detections = $result.total_detections(),
            backend = ?$result.backend,
            processing_time_ms = $result.processing_time,
            "Processed document"
        );
    };
}

/// Log a switch to the regex fallback
///
/// # Example
///
/// ```no_run
/// use veil::log_backend_fallback;
/// use veil::domain::RecognizerError;
///
/// let error = RecognizerError::Timeout("30s".to_string());
/// log_backend_fallback!(&error, "recognition");
/// ```
#[macro_export]
macro_rules! log_backend_fallback {
    ($error:expr, $stage:expr) => {
        tracing::warn!(
            error = %$error,
            stage = $stage,
            "NER backend unavailable, using pattern fallback"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use veil::log_error_with_context;
/// use veil::domain::VeilError;
///
/// let error = VeilError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

#[cfg(test)]
mod tests {
    use crate::anonymization::models::{DetectionBackend, DetectionResult};
    use crate::domain::{RecognizerError, VeilError};

    #[test]
    fn test_macros_expand() {
        let result = DetectionResult::new(
            "a".to_string(),
            "a".to_string(),
            vec![],
            DetectionBackend::Ner,
            1.5,
        );
        log_detection_summary!(&result);
        log_backend_fallback!(&RecognizerError::Unavailable("down".to_string()), "init");
        log_error_with_context!(&VeilError::Other("x".to_string()), "test");
    }
}
