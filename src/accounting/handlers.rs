use axum::{
    extract::Extension,
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use super::protocol::{
    now_ms, ErrorResponse, HealthResponse, LoadTestResponse, ResetResponse, StatsResponse,
    VisitResponse, ENDPOINT_HEALTH, ENDPOINT_LOAD_TEST, ENDPOINT_RESET, ENDPOINT_ROOT,
    ENDPOINT_STATS,
};
use super::service::AccountingService;

/// Iteration count for the synthetic load endpoint. Deterministic, not
/// wall-clock-bounded, so samples are comparable across instances.
const LOAD_TEST_ITERATIONS: u64 = 5_000_000;

/// Builds the HTTP surface of one application instance.
pub fn router(service: Arc<AccountingService>) -> Router {
    Router::new()
        .route(ENDPOINT_ROOT, get(handle_visit))
        .route(ENDPOINT_HEALTH, get(handle_health))
        .route(ENDPOINT_STATS, get(handle_stats))
        .route(ENDPOINT_LOAD_TEST, get(handle_load_test))
        .route(ENDPOINT_RESET, post(handle_reset))
        .fallback(handle_unknown_path)
        .layer(Extension(service))
}

pub async fn handle_health(
    Extension(service): Extension<Arc<AccountingService>>,
) -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            instance: service.instance_id.clone(),
            timestamp: now_ms(),
        }),
    )
}

pub async fn handle_visit(
    Extension(service): Extension<Arc<AccountingService>>,
    headers: HeaderMap,
) -> (StatusCode, Json<VisitResponse>) {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let record = service.record_visit().await;

    (
        StatusCode::OK,
        Json(VisitResponse {
            message: format!("Hello from instance {}", service.instance_id),
            instance_id: service.instance_id.clone(),
            session_id: service.session_id.clone(),
            request_number: record.request_number,
            timestamp: now_ms(),
            hostname: service.hostname.clone(),
            user_agent,
            store_available: record.store_available,
            stats: record.stats,
        }),
    )
}

pub async fn handle_stats(
    Extension(service): Extension<Arc<AccountingService>>,
) -> (StatusCode, Json<StatsResponse>) {
    let snapshot = service.stats().await;

    (
        StatusCode::OK,
        Json(StatsResponse {
            instance_id: service.instance_id.clone(),
            session_id: service.session_id.clone(),
            local_requests: snapshot.local_requests,
            store_available: snapshot.store_available,
            global_total: snapshot.global_total,
            instances: snapshot.instances,
            timestamp: now_ms(),
        }),
    )
}

pub async fn handle_load_test(
    Extension(service): Extension<Arc<AccountingService>>,
) -> Response {
    match service.synthetic_load(LOAD_TEST_ITERATIONS).await {
        Ok(sample) => (
            StatusCode::OK,
            Json(LoadTestResponse {
                instance_id: service.instance_id.clone(),
                processing_time: sample.elapsed_ms,
                result: sample.result,
                timestamp: now_ms(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Synthetic load failed: {}", e);
            internal_error(&service, "load test failed")
        }
    }
}

pub async fn handle_reset(
    Extension(service): Extension<Arc<AccountingService>>,
) -> Response {
    match service.reset().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ResetResponse {
                status: "reset".to_string(),
                instance_id: service.instance_id.clone(),
                timestamp: now_ms(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Reset failed: {}", e);
            internal_error(&service, "reset failed")
        }
    }
}

// Unroutable requests are recoverable, not an error condition; no error log.
pub async fn handle_unknown_path(
    Extension(service): Extension<Arc<AccountingService>>,
    uri: Uri,
) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "not found".to_string(),
            instance_id: service.instance_id.clone(),
            requested_path: Some(uri.path().to_string()),
        }),
    )
}

fn internal_error(service: &AccountingService, message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: message.to_string(),
            instance_id: service.instance_id.clone(),
            requested_path: None,
        }),
    )
        .into_response()
}
