//! Recognizer factory
//!
//! Builds the recognizer backend selected by configuration.

use super::{EntityRecognizer, HttpRecognizer};
use crate::config::RecognizerConfig;
use crate::domain::Result;
use std::sync::Arc;

/// Create the recognizer described by `config`
///
/// Returns `None` when the recognizer is disabled, in which case detection
/// runs on the regex fallback only.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be created
pub fn create_recognizer(config: &RecognizerConfig) -> Result<Option<Arc<dyn EntityRecognizer>>> {
    if !config.enabled {
        tracing::info!("Recognizer disabled, using pattern fallback only");
        return Ok(None);
    }

    tracing::info!(endpoint = %config.endpoint, model = %config.model_name, "Creating HTTP recognizer");
    let recognizer = HttpRecognizer::new(config)?;
    Ok(Some(Arc::new(recognizer) as Arc<dyn EntityRecognizer>))
}
