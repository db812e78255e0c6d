//! The ramp scheduler: stage timeline, lane lifecycle, aggregation

use crate::error::EngineError;
use crate::lane::LaneHandle;
use crate::recorder::SampleLog;
use stampede_core::{RunReport, Stage, ThresholdSpec, WorkUnit};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Drives staged concurrency ramps against a work unit.
///
/// Concurrency steps to each stage's target the instant the stage begins:
/// ramp-up spawns lanes with the next unused increasing indices, ramp-down
/// retires the highest-index lanes first. Retired lanes finish their current
/// iteration before exiting; they are never cancelled mid-work-unit.
pub struct RampScheduler {
    iteration_delay: Duration,
    drain_timeout: Duration,
}

impl RampScheduler {
    pub fn new() -> Self {
        Self {
            iteration_delay: Duration::ZERO,
            drain_timeout: Duration::from_secs(5),
        }
    }

    /// Set the pause each lane inserts between iterations (default: none).
    pub fn with_iteration_delay(mut self, delay: Duration) -> Self {
        self.iteration_delay = delay;
        self
    }

    /// Maximum wait for in-flight lanes after the final stage (default: 5s).
    pub fn with_drain_timeout(mut self, timeout: Duration) -> Self {
        self.drain_timeout = timeout;
        self
    }

    /// Run all stages to completion, then aggregate and evaluate thresholds.
    pub async fn run(
        &self,
        stages: &[Stage],
        work: Arc<dyn WorkUnit>,
        thresholds: &[ThresholdSpec],
    ) -> Result<RunReport, EngineError> {
        self.run_until(stages, work, thresholds, std::future::pending::<()>())
            .await
    }

    /// Like [`run`](Self::run), but stops early when `shutdown` resolves.
    ///
    /// An external abort still drains in-flight lanes and produces a report
    /// over whatever was recorded up to that point.
    pub async fn run_until<F>(
        &self,
        stages: &[Stage],
        work: Arc<dyn WorkUnit>,
        thresholds: &[ThresholdSpec],
        shutdown: F,
    ) -> Result<RunReport, EngineError>
    where
        F: Future<Output = ()> + Send,
    {
        if stages.is_empty() {
            return Err(EngineError::InvalidScenario(
                "stage list must not be empty".to_string(),
            ));
        }

        let log = SampleLog::new();
        let run_started = Instant::now();

        // Active lanes, ordered by slot index
        let mut lanes: Vec<LaneHandle> = Vec::new();
        let mut retired: Vec<LaneHandle> = Vec::new();
        let mut next_index = 0usize;

        tokio::pin!(shutdown);

        for (position, stage) in stages.iter().enumerate() {
            info!(
                "Stage {}: {} lane(s) for {:?}",
                position, stage.target, stage.duration
            );

            // Retire the highest-index lanes first
            while lanes.len() > stage.target {
                if let Some(lane) = lanes.pop() {
                    debug!("Retiring lane {}", lane.index);
                    lane.retire();
                    retired.push(lane);
                }
            }

            // Spawn new lanes on the next unused increasing indices
            while lanes.len() < stage.target {
                lanes.push(LaneHandle::spawn(
                    next_index,
                    work.clone(),
                    log.clone(),
                    self.iteration_delay,
                ));
                next_index += 1;
            }

            tokio::select! {
                _ = tokio::time::sleep(stage.duration) => {}
                _ = &mut shutdown => {
                    info!("Abort requested during stage {}; stopping all lanes", position);
                    break;
                }
            }
        }

        // Broadcast stop and drain
        for lane in &lanes {
            lane.retire();
        }
        retired.append(&mut lanes);

        let abandoned = self.drain(retired).await;
        if abandoned > 0 {
            warn!(
                "{} lane(s) exceeded the {:?} drain timeout and were abandoned",
                abandoned, self.drain_timeout
            );
        }

        let samples = log.collect().await;
        let report = RunReport::build(&samples, run_started.elapsed(), thresholds);
        info!(
            "Run complete: {} samples, {} failed, {:.1} req/s",
            report.total_samples, report.failure_count, report.requests_per_second
        );

        Ok(report)
    }

    /// Await retired lanes up to the drain timeout; abort stragglers so an
    /// abandoned lane can never append after aggregation begins.
    async fn drain(&self, lanes: Vec<LaneHandle>) -> usize {
        let deadline = Instant::now() + self.drain_timeout;
        let mut abandoned = 0;

        for mut lane in lanes {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match tokio::time::timeout(remaining, &mut lane.handle).await {
                Ok(Ok(())) => {}
                Ok(Err(join_error)) => {
                    warn!("Lane {} terminated abnormally: {}", lane.index, join_error);
                }
                Err(_) => {
                    debug!("Abandoning lane {} still in flight", lane.index);
                    lane.handle.abort();
                    let _ = lane.handle.await;
                    abandoned += 1;
                }
            }
        }

        abandoned
    }
}

impl Default for RampScheduler {
    fn default() -> Self {
        Self::new()
    }
}
