//! Core domain models and types for Stampede
//!
//! This crate defines the data model shared by the scheduler, the HTTP work
//! unit, and the CLI: stages, samples, threshold specifications, and the
//! final run report. It also owns the [`WorkUnit`] trait, the seam through
//! which the engine drives an injected exchange without knowing its
//! transport.

pub mod report;
pub mod threshold;
pub mod types;
pub mod work;

// Re-export main types
pub use report::{LatencySummary, RunReport};
pub use threshold::{
    AggregateMetric, Comparator, ComparatorParseError, MetricParseError, ThresholdResult,
    ThresholdSpec,
};
pub use types::{Outcome, Sample, Stage};
pub use work::{WorkError, WorkUnit};
