//! Domain error and result types for Veil.
//!
//! All fallible library operations return [`Result<T, VeilError>`]:
//!
//! ```rust
//! use veil::domain::{Result, VeilError};
//!
//! fn example() -> Result<()> {
//!     // Errors are automatically converted using the ? operator
//!     let config = veil::config::load_config("veil.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! Errors from the recognizer backend ([`RecognizerError`]) are absorbed by the
//! detector and only surface through logging and the backend status flag.

pub mod errors;
pub mod result;

pub use errors::{AnonymizationError, ExportError, RecognizerError, VeilError};
pub use result::Result;
