//! HTTP work unit for Stampede
//!
//! Implements the engine's [`WorkUnit`](stampede_core::WorkUnit) seam with a
//! reqwest client: one configured request per iteration, success judged by
//! the response status. The client is built once and shared across lanes so
//! every iteration reuses the same connection pool.

pub mod client;
pub mod errors;
pub mod types;

// Re-export main types
pub use client::HttpWorkUnit;
pub use errors::HttpError;
pub use types::{HttpMethod, HttpMethodError};
