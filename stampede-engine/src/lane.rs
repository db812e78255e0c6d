//! Virtual-user lanes

use crate::recorder::SampleLog;
use chrono::Utc;
use stampede_core::{Outcome, Sample, WorkUnit};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

/// Handle to one running lane.
///
/// A lane repeatedly executes the work unit and records a sample per
/// execution. The stop flag is observed at iteration boundaries only: a lane
/// mid-work-unit always finishes that unit, and its sample is recorded,
/// before it exits.
pub(crate) struct LaneHandle {
    pub(crate) index: usize,
    stop: Arc<AtomicBool>,
    pub(crate) handle: JoinHandle<()>,
}

impl LaneHandle {
    /// Spawn a lane on slot `index`.
    pub(crate) fn spawn(
        index: usize,
        work: Arc<dyn WorkUnit>,
        log: SampleLog,
        iteration_delay: Duration,
    ) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();

        let handle = tokio::spawn(async move {
            debug!("Lane {} starting", index);

            loop {
                let started = Instant::now();
                let result = work.execute(index).await;
                let latency = started.elapsed();

                // Failures are data, not control flow
                let outcome = match result {
                    Ok(()) => Outcome::Success,
                    Err(error) => {
                        debug!("Lane {} iteration failed: {}", index, error);
                        Outcome::Failure
                    }
                };

                log.append(Sample {
                    lane: index,
                    timestamp: Utc::now(),
                    latency,
                    outcome,
                })
                .await;

                if stop_flag.load(Ordering::Relaxed) {
                    break;
                }

                if !iteration_delay.is_zero() {
                    tokio::time::sleep(iteration_delay).await;

                    if stop_flag.load(Ordering::Relaxed) {
                        break;
                    }
                }
            }

            debug!("Lane {} stopped", index);
        });

        Self {
            index,
            stop,
            handle,
        }
    }

    /// Ask the lane to stop after its current iteration.
    pub(crate) fn retire(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}
