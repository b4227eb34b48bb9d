//! Anonymization strategy module
//!
//! Provides the substitution strategies selected by [`AnonymizationMode`].

pub mod masking;
pub mod placeholder;
pub mod removal;

use crate::anonymization::config::AnonymizationMode;

pub use masking::MaskStrategy;
pub use placeholder::PlaceholderStrategy;
pub use removal::RemovalStrategy;

/// Position of one detection among the detections sharing its placeholder name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderSlot {
    /// Placeholder name (`EMAIL`, `CREDIT_CARD`, ...)
    pub name: &'static str,
    /// 1-based occurrence index in left-to-right order
    pub index: usize,
    /// Number of detections sharing the name
    pub total: usize,
}

impl PlaceholderSlot {
    /// Bracketed token; numbered only when the name occurs more than once
    pub fn token(&self) -> String {
        if self.total > 1 {
            format!("[{}_{}]", self.name, self.index)
        } else {
            format!("[{}]", self.name)
        }
    }
}

/// Trait for anonymization strategy implementations
pub trait Anonymizer: Send + Sync {
    /// Text substituted for the matched span `matched`
    fn replacement(&self, matched: &str, slot: &PlaceholderSlot) -> String;
}

/// Strategy for a substitution mode
pub fn for_mode(mode: AnonymizationMode) -> Box<dyn Anonymizer> {
    match mode {
        AnonymizationMode::Mask => Box::new(MaskStrategy::new()),
        AnonymizationMode::Label | AnonymizationMode::Replace => {
            Box::new(PlaceholderStrategy::new())
        }
        AnonymizationMode::Remove => Box::new(RemovalStrategy::new()),
    }
}
