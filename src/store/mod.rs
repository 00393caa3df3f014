//! Counter Store Module
//!
//! Adapter for the shared key-value service that holds the visit counters.
//!
//! ## Core Concepts
//! - **Contract**: `CounterStore` exposes atomic increment, read, delete, and a
//!   liveness command. All cross-instance coordination goes through this contract.
//! - **Atomicity**: increments serialize at the store, never read-modify-write
//!   locally, so concurrent callers on the same key lose no updates.
//! - **Absence**: a counter that was never incremented reads as zero; only a
//!   store-level failure is an error.

pub mod client;
pub mod keys;
pub mod memory;

#[cfg(test)]
mod tests;

pub use client::{CounterStore, HttpCounterStore};
pub use memory::MemoryCounterStore;
