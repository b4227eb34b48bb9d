//! Masking anonymization strategy

use super::{Anonymizer, PlaceholderSlot};

/// Mask character
const MASK_CHAR: char = '*';

/// Masking strategy - replaces every character of the match with `*`
pub struct MaskStrategy;

impl MaskStrategy {
    /// Create a new masking strategy
    pub fn new() -> Self {
        Self
    }
}

impl Anonymizer for MaskStrategy {
    fn replacement(&self, matched: &str, _slot: &PlaceholderSlot) -> String {
        // One mask char per character, not per byte
        std::iter::repeat(MASK_CHAR)
            .take(matched.chars().count())
            .collect()
    }
}

impl Default for MaskStrategy {
    fn default() -> Self {
        Self::new()
    }
}
