//! Instance Accounting Module
//!
//! The application-facing core of the demo. Each running instance owns one
//! `AccountingService`, constructed at startup with its identity, its session
//! id, and an injected counter store handle.
//!
//! ## Core Concepts
//! - **Visit counting**: every inbound request bumps a local tally plus the
//!   global and per-instance counters in the shared store.
//! - **Degraded responses**: a store failure never fails the primary request;
//!   the response simply omits the counter fields and flags the store as
//!   unavailable.
//! - **Attribution**: every HTTP response carries the serving instance's
//!   identity, including 404 and 500 paths.

pub mod handlers;
pub mod protocol;
pub mod service;
