//! Removal anonymization strategy

use super::{Anonymizer, PlaceholderSlot};

/// Removal strategy - excises the span entirely
pub struct RemovalStrategy;

impl RemovalStrategy {
    /// Create a new removal strategy
    pub fn new() -> Self {
        Self
    }
}

impl Anonymizer for RemovalStrategy {
    fn replacement(&self, _matched: &str, _slot: &PlaceholderSlot) -> String {
        String::new()
    }
}

impl Default for RemovalStrategy {
    fn default() -> Self {
        Self::new()
    }
}
