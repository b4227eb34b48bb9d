//! NER-first detector with regex fallback
//!
//! The NER backend is initialized once, in the background. Until it reports
//! ready, and forever after if initialization fails, calls are answered by
//! the regex fallback. A failing call falls back for that call only; the
//! backend stays enabled for the next one.

use super::{BackendStatus, DetectionOutcome, NerDetector, PiiDetector, RegexDetector};
use crate::anonymization::config::DetectorConfig;
use crate::anonymization::models::DetectionBackend;
use crate::log_backend_fallback;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Detector that prefers the NER backend and falls back to patterns
pub struct HybridDetector {
    ner: Option<NerDetector>,
    fallback: RegexDetector,
    status: Arc<watch::Sender<BackendStatus>>,
    started: AtomicBool,
}

impl HybridDetector {
    /// Create a detector; without a NER backend it is fallback-only
    pub fn new(ner: Option<NerDetector>, fallback: RegexDetector) -> Self {
        let initial = if ner.is_some() {
            BackendStatus::Initializing
        } else {
            BackendStatus::Fallback
        };
        let (status, _) = watch::channel(initial);

        Self {
            ner,
            fallback,
            status: Arc::new(status),
            started: AtomicBool::new(false),
        }
    }

    /// Start backend initialization in the background
    ///
    /// Only the first call spawns the task; later calls, and calls on a
    /// fallback-only detector, return `None`. Must be called from within a
    /// Tokio runtime.
    pub fn initialize(&self) -> Option<JoinHandle<()>> {
        let ner = self.ner.clone()?;
        if self.started.swap(true, Ordering::SeqCst) {
            return None;
        }

        let status = Arc::clone(&self.status);
        let load = tokio::spawn(async move { ner.load().await });
        Some(tokio::spawn(async move {
            let next = match load.await {
                Ok(Ok(())) => {
                    tracing::info!("NER backend ready");
                    BackendStatus::Ready
                }
                Ok(Err(e)) => {
                    log_backend_fallback!(e, "initialization");
                    BackendStatus::Fallback
                }
                // A panicking backend must still settle the status
                Err(e) => {
                    log_backend_fallback!(e, "initialization");
                    BackendStatus::Fallback
                }
            };
            status.send_replace(next);
        }))
    }

    /// Receiver notified on every status change
    pub fn subscribe(&self) -> watch::Receiver<BackendStatus> {
        self.status.subscribe()
    }

    /// Wait for initialization to settle, starting it if needed
    pub async fn wait_until_initialized(&self) -> BackendStatus {
        self.initialize();
        let mut receiver = self.subscribe();
        let settled = match receiver
            .wait_for(|status| *status != BackendStatus::Initializing)
            .await
        {
            Ok(status) => *status,
            Err(_) => *self.status.borrow(),
        };
        settled
    }
}

#[async_trait]
impl PiiDetector for HybridDetector {
    async fn detect(&self, text: &str, config: &DetectorConfig) -> DetectionOutcome {
        if let (Some(ner), BackendStatus::Ready) = (&self.ner, self.status()) {
            match ner.detect(text, config).await {
                Ok(detections) => {
                    return DetectionOutcome {
                        detections,
                        backend: DetectionBackend::Ner,
                    }
                }
                Err(e) => {
                    log_backend_fallback!(e, "recognition");
                }
            }
        }

        self.fallback.detect(text, config).await
    }

    fn status(&self) -> BackendStatus {
        *self.status.borrow()
    }
}
