//! Append-only sample log shared by all lanes

use stampede_core::Sample;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Append-only log of recorded samples.
///
/// Appends are mutually exclusive; aggregation reads the log only after
/// every lane has stopped or been aborted, so readers never race a writer.
#[derive(Clone, Default)]
pub struct SampleLog {
    samples: Arc<Mutex<Vec<Sample>>>,
}

impl SampleLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one execution. Samples are never mutated or removed afterwards.
    pub async fn append(&self, sample: Sample) {
        self.samples.lock().await.push(sample);
    }

    /// Drain the recorded samples for aggregation.
    ///
    /// Called once, after all lanes have stopped.
    pub async fn collect(&self) -> Vec<Sample> {
        let mut samples = self.samples.lock().await;
        std::mem::take(&mut *samples)
    }
}
