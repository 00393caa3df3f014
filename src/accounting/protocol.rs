//! Instance HTTP Surface Protocol
//!
//! Defines the endpoints exposed by every application instance and the
//! Data Transfer Objects (DTOs) returned from them.
//!
//! These structures are serialized as JSON. Field names follow the wire
//! convention consumed by the proxy's test harness and the diagnostics tool
//! (camelCase), and every body carries the serving instance's identity so
//! external callers can attribute each response to a specific replica.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

// --- API Endpoints ---

/// Local health endpoint, reached directly as well as through the balancer.
pub const ENDPOINT_HEALTH: &str = "/health";
/// Visit-counting entry point.
pub const ENDPOINT_ROOT: &str = "/";
/// Read-only counter view.
pub const ENDPOINT_STATS: &str = "/api/stats";
/// CPU-bound synthetic load endpoint for instance-attributable timing samples.
pub const ENDPOINT_LOAD_TEST: &str = "/api/load-test";
/// Deletes all known counters and zeroes the local tally.
pub const ENDPOINT_RESET: &str = "/api/reset";

/// Milliseconds since the Unix epoch, used as the wire timestamp everywhere.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// --- Data Transfer Objects ---

/// Body of `GET /health`. Always succeeds while the process is up.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub instance: String,
    pub timestamp: u64,
}

/// Counter view attached to a visit response when the store answered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitStats {
    /// New value of the global counter after this visit.
    pub global_total: u64,
    /// New value of this instance's counter after this visit.
    pub instance_total: u64,
}

/// Body of `GET /`.
///
/// `stats` is omitted and `store_available` is false when the counter store
/// could not be reached; the visit itself still succeeds.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitResponse {
    pub message: String,
    pub instance_id: String,
    pub session_id: String,
    /// Requests served by this process since startup or the last reset.
    pub request_number: u64,
    pub timestamp: u64,
    pub hostname: String,
    pub user_agent: String,
    pub store_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<VisitStats>,
}

/// One per-instance counter row in the stats view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceCount {
    pub instance_id: String,
    /// Counter value; an identity that never served a visit reads as 0.
    pub visits: u64,
}

/// Body of `GET /api/stats`.
///
/// `local_requests` is this process's own tally and is always present;
/// the store-backed fields are omitted when the store is unreachable.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub instance_id: String,
    pub session_id: String,
    pub local_requests: u64,
    pub store_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_total: Option<u64>,
    pub instances: Vec<InstanceCount>,
    pub timestamp: u64,
}

/// Body of `GET /api/load-test`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadTestResponse {
    pub instance_id: String,
    /// Wall time of the CPU-bound work, in milliseconds.
    pub processing_time: u64,
    /// Deterministic arithmetic result, returned so the work cannot be elided.
    pub result: f64,
    pub timestamp: u64,
}

/// Confirmation body of `POST /api/reset`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetResponse {
    pub status: String,
    pub instance_id: String,
    pub timestamp: u64,
}

/// Error body for 404 and 500 responses. The instance identity stays present
/// on every error path so failures remain attributable.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub instance_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_path: Option<String>,
}
