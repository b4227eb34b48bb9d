//! Placeholder anonymization strategy

use super::{Anonymizer, PlaceholderSlot};

/// Placeholder strategy - replaces PII with `[TYPE]` or `[TYPE_N]` tokens
pub struct PlaceholderStrategy;

impl PlaceholderStrategy {
    /// Create a new placeholder strategy
    pub fn new() -> Self {
        Self
    }
}

impl Anonymizer for PlaceholderStrategy {
    fn replacement(&self, _matched: &str, slot: &PlaceholderSlot) -> String {
        slot.token()
    }
}

impl Default for PlaceholderStrategy {
    fn default() -> Self {
        Self::new()
    }
}
