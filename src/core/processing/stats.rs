//! Cumulative processing statistics

use crate::anonymization::models::DetectionResult;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// Statistics across every processed document since the last reset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingStats {
    /// Documents processed
    pub total_documents: u64,

    /// Detections across all documents
    pub total_detections: u64,

    /// Mean confidence of the most recent document that had detections
    pub average_confidence: f64,

    /// Cumulative processing time (ms)
    pub processing_time: f64,

    /// Mean confidence over every detection recorded
    pub running_average_confidence: f64,
}

#[derive(Debug, Default)]
struct TrackerState {
    stats: ProcessingStats,
    confidence_sum: f64,
}

/// Mutex-guarded statistics record
///
/// `average_confidence` is replaced by each document's own mean rather than
/// accumulated; documents without detections leave it untouched.
/// `running_average_confidence` carries the true mean.
#[derive(Debug, Default)]
pub struct StatsTracker {
    state: Mutex<TrackerState>,
}

impl StatsTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one result into the record and return the updated snapshot
    pub async fn record(&self, result: &DetectionResult) -> ProcessingStats {
        let mut state = self.state.lock().await;

        state.stats.total_documents += 1;
        state.stats.total_detections += result.total_detections() as u64;
        state.stats.processing_time += result.processing_time;

        if let Some(mean) = result.mean_confidence() {
            state.stats.average_confidence = mean;
            state.confidence_sum += result
                .detections
                .iter()
                .map(|d| d.confidence as f64)
                .sum::<f64>();
            state.stats.running_average_confidence =
                state.confidence_sum / state.stats.total_detections as f64;
        }

        state.stats.clone()
    }

    /// Current snapshot
    pub async fn snapshot(&self) -> ProcessingStats {
        self.state.lock().await.stats.clone()
    }

    /// Zero every counter
    pub async fn reset(&self) {
        *self.state.lock().await = TrackerState::default();
    }
}
