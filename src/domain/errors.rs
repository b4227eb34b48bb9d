//! Domain error types
//!
//! This module defines the error hierarchy for Veil. All errors are
//! domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Veil error type
///
/// This is the primary error type used throughout the library.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum VeilError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Recognizer backend errors
    #[error("Recognizer error: {0}")]
    Recognizer(#[from] RecognizerError),

    /// Anonymization contract violations
    #[error("Anonymization error: {0}")]
    Anonymization(#[from] AnonymizationError),

    /// Export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Recognizer backend errors
///
/// Errors raised by an [`EntityRecognizer`](crate::adapters::recognizer::EntityRecognizer)
/// implementation. The detector absorbs every one of them and falls back to
/// pattern matching, so they never reach the caller of `process`.
#[derive(Debug, Error)]
pub enum RecognizerError {
    /// Backend was never configured or failed to initialize
    #[error("Recognizer backend unavailable: {0}")]
    Unavailable(String),

    /// Failed to reach the inference endpoint
    #[error("Failed to connect to recognizer endpoint: {0}")]
    ConnectionFailed(String),

    /// Model is still loading on the inference server
    #[error("Model is loading, estimated time: {0}s")]
    ModelLoading(f64),

    /// Authentication rejected by the inference endpoint
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Invalid response body
    #[error("Invalid response from recognizer: {0}")]
    InvalidResponse(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

impl RecognizerError {
    /// Whether the error means the backend is unusable for the whole session
    /// rather than for a single call
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            Self::Unavailable(_) | Self::AuthenticationFailed(_) | Self::ClientError { .. }
        )
    }
}

/// Anonymization contract violations
///
/// Offsets are produced by trusted detectors, so any of these indicates a
/// programming error upstream.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnonymizationError {
    /// Span does not satisfy `start < end <= len`
    #[error("Span {start}..{end} is invalid for text of length {len}")]
    SpanOutOfBounds {
        start: usize,
        end: usize,
        len: usize,
    },

    /// Span offset splits a multi-byte character
    #[error("Offset {offset} is not on a character boundary")]
    NotCharBoundary { offset: usize },
}

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    /// Nothing has been processed yet
    #[error("No current result to export")]
    NoResult,

    /// Unknown export format
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// Serialization failed
    #[error("Failed to serialize export: {0}")]
    Serialization(String),

    /// Writing the export failed
    #[error("Failed to write export: {0}")]
    Write(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for VeilError {
    fn from(err: std::io::Error) -> Self {
        VeilError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for VeilError {
    fn from(err: serde_json::Error) -> Self {
        VeilError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for VeilError {
    fn from(err: toml::de::Error) -> Self {
        VeilError::Configuration(format!("TOML parse error: {err}"))
    }
}
