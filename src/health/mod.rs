//! Health Aggregation Module
//!
//! Runs independent health probes against every target in the deployment and
//! summarizes pass/fail per target.
//!
//! ## Core Mechanisms
//! - **Three probe classes**: the proxy's status endpoint, each instance's
//!   direct `/health` endpoint (bypassing the balancer), and the counter
//!   store's liveness command.
//! - **No short-circuiting**: each probe carries its own timeout and runs to
//!   completion regardless of what happened to the others.
//! - **Tri-state results**: `Unknown` (the probe could not be dispatched) is
//!   kept distinct from `Unhealthy` (the probe ran and failed).

pub mod service;
pub mod types;


pub use service::HealthAggregator;
pub use types::{HealthSummary, InstanceTarget, TargetKind, TargetReport, TargetStatus};
