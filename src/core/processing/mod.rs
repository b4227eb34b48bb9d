// Per-document processing and statistics

pub mod processor;
pub mod stats;

pub use processor::{render, PiiProcessor};
pub use stats::{ProcessingStats, StatsTracker};
