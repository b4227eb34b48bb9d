//! Audit logging module
//!
//! Append-only record of processing runs with hashed PII values.

pub mod logger;

pub use logger::AuditLogger;
