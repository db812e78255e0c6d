//! The work-unit seam between the scheduler and an injected exchange

use async_trait::async_trait;

/// Error surfaced by a work unit. Recorded as a failed sample, never fatal.
pub type WorkError = Box<dyn std::error::Error + Send + Sync>;

/// One repeatable request/response exchange driven by the scheduler.
///
/// The scheduler treats implementations as opaque capabilities: it measures
/// wall-clock latency around `execute` and records the outcome, without
/// inspecting the transport underneath. Implementations should construct
/// heavy resources (clients, connection pools) once, outside the hot path;
/// `execute` runs once per iteration on every active lane.
#[async_trait]
pub trait WorkUnit: Send + Sync {
    /// Perform one exchange on behalf of lane `lane`.
    ///
    /// An `Err` marks the iteration as failed; it does not stop the lane or
    /// abort the run.
    async fn execute(&self, lane: usize) -> Result<(), WorkError>;
}
