//! Load-Balanced Web-Tier Demo Library
//!
//! This library crate defines the core modules behind the demo's two binaries:
//! the application instance (`main.rs`) and the deployment diagnostics tool
//! (`bin/doctor.rs`).
//!
//! ## Architecture Modules
//! The system is composed of five loosely coupled subsystems:
//!
//! - **`store`**: The counter store adapter. Defines the atomic increment/get/delete
//!   contract shared by all instances and provides an HTTP client for a remote
//!   key-value service plus an in-memory backend for tests and single-process demos.
//! - **`accounting`**: The application-facing core. Tracks visits per instance and
//!   globally, serves the instance's HTTP surface, and degrades gracefully when the
//!   counter store is unreachable.
//! - **`probe`**: The readiness prober. Polls an endpoint with a bounded attempt
//!   count and a fixed interval, gating deployment steps on the result.
//! - **`sampler`**: The load-distribution sampler. Issues a fixed number of requests
//!   through the shared entry point and records which instance answered each one.
//! - **`health`**: The health aggregator. Runs independent probes against the proxy,
//!   each instance, and the counter store, and summarizes per-target status.

pub mod accounting;
pub mod health;
pub mod probe;
pub mod sampler;
pub mod store;
