//! Error types for the ramp scheduler

use thiserror::Error;

/// Errors raised by the scheduler.
///
/// Work-unit failures are not errors: they are recorded as failed samples.
/// The only run-aborting condition is an invalid scenario, reported before
/// any lane starts.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),
}
