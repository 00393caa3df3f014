//! Readiness Probing Module
//!
//! Bounded-retry readiness polling used by the deployment tooling to gate
//! further action on a freshly started tier.
//!
//! ## Core Mechanisms
//! - **State machine**: `Waiting -> {Ready | Exhausted}`. A success status
//!   transitions to `Ready` immediately; `max_attempts` consecutive failures
//!   end in `Exhausted`, a terminal state for that run.
//! - **Strictly sequential**: one attempt completes, including its delay,
//!   before the next begins; a timed-out request is abandoned and counted
//!   failed, never cancelled.
//! - **Restartable**: a new `wait_ready` call starts fresh with no memory of
//!   prior runs.

pub mod service;
pub mod types;


pub use service::ReadinessProber;
pub use types::{ProbeAttempt, ProbeOutcome, Readiness, ReadinessReport};
