//! Load Distribution Sampling Module
//!
//! Empirically validates that the balancer in front of the tier is actually
//! distributing traffic.
//!
//! ## Core Mechanisms
//! - **Fixed sample size**: N sequential requests against the shared entry
//!   point, each attributed to the instance named in the response body.
//! - **Failure isolation**: an individual request failure is recorded at its
//!   sample index and never aborts the remaining samples.
//! - **Raw observations**: output is an ordered log for a human or external
//!   checker; the only derived signal is the single-identity anomaly flag.

pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use service::LoadSampler;
pub use types::{Observation, SampleOutcome, SampleRun};
