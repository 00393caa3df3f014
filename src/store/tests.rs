//! Counter Store Tests
//!
//! Validates the counter contract against both backends.
//!
//! ## Test Scopes
//! - **Memory backend**: increment/read/delete semantics and concurrent
//!   increments without lost updates.
//! - **HTTP backend**: wire behavior against a minimal key-value server,
//!   including the absent-counter-reads-as-zero rule and store failures.

#[cfg(test)]
mod tests {
    use crate::store::client::{CounterStore, CounterValue, HttpCounterStore};
    use crate::store::keys::{instance_visits, GLOBAL_VISITS};
    use crate::store::memory::MemoryCounterStore;
    use axum::extract::{Extension, Path};
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use dashmap::DashMap;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;

    // ============================================================
    // KEY NAMING TESTS
    // ============================================================

    #[test]
    fn test_instance_key_includes_identity() {
        assert_eq!(instance_visits("1"), "visits:instance:1");
        assert_ne!(instance_visits("1"), instance_visits("2"));
        assert_ne!(instance_visits("1"), GLOBAL_VISITS);
    }

    // ============================================================
    // MEMORY BACKEND TESTS
    // ============================================================

    #[tokio::test]
    async fn test_memory_incr_is_monotonic() {
        let store = MemoryCounterStore::new();

        assert_eq!(store.incr("visits:total").await.unwrap(), 1);
        assert_eq!(store.incr("visits:total").await.unwrap(), 2);
        assert_eq!(store.incr("visits:total").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_memory_absent_counter_reads_as_zero() {
        let store = MemoryCounterStore::new();

        assert_eq!(store.get("never-incremented").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_memory_del_is_idempotent() {
        let store = MemoryCounterStore::new();

        store.incr("visits:total").await.unwrap();
        store.del("visits:total").await.unwrap();
        store.del("visits:total").await.unwrap(); // already absent, still ok

        assert_eq!(store.get("visits:total").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_memory_concurrent_incr_loses_no_updates() {
        let store = Arc::new(MemoryCounterStore::new());

        let mut handles = Vec::new();
        for _ in 0..100 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.incr(GLOBAL_VISITS).await.unwrap();
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.get(GLOBAL_VISITS).await.unwrap(), 100);
    }

    // ============================================================
    // HTTP BACKEND TESTS
    // ============================================================

    type KvState = Arc<DashMap<String, u64>>;

    async fn kv_incr(
        Extension(counters): Extension<KvState>,
        Path(key): Path<String>,
    ) -> Json<CounterValue> {
        let mut entry = counters.entry(key).or_insert(0);
        *entry += 1;
        Json(CounterValue { value: *entry })
    }

    async fn kv_get(Extension(counters): Extension<KvState>, Path(key): Path<String>) -> Response {
        match counters.get(&key) {
            Some(value) => (StatusCode::OK, Json(CounterValue { value: *value })).into_response(),
            None => StatusCode::NOT_FOUND.into_response(),
        }
    }

    async fn kv_del(
        Extension(counters): Extension<KvState>,
        Path(key): Path<String>,
    ) -> StatusCode {
        counters.remove(&key);
        StatusCode::OK
    }

    /// Spawns a minimal key-value server standing in for the real store.
    async fn spawn_kv_server() -> SocketAddr {
        let counters: KvState = Arc::new(DashMap::new());

        let app = Router::new()
            .route("/incr/:key", post(kv_incr))
            .route("/get/:key", get(kv_get))
            .route("/del/:key", post(kv_del))
            .route("/ping", get(|| async { StatusCode::OK }))
            .layer(Extension(counters));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        tokio::time::sleep(Duration::from_millis(50)).await;

        addr
    }

    #[tokio::test]
    async fn test_http_store_round_trip() {
        let addr = spawn_kv_server().await;
        let store = HttpCounterStore::new(&format!("http://{}", addr));

        assert_eq!(store.incr("visits:total").await.unwrap(), 1);
        assert_eq!(store.incr("visits:total").await.unwrap(), 2);
        assert_eq!(store.get("visits:total").await.unwrap(), 2);

        store.del("visits:total").await.unwrap();
        assert_eq!(store.get("visits:total").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_http_store_absent_counter_reads_as_zero() {
        let addr = spawn_kv_server().await;
        let store = HttpCounterStore::new(&format!("http://{}", addr));

        assert_eq!(store.get("never-incremented").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_http_store_ping() {
        let addr = spawn_kv_server().await;
        let store = HttpCounterStore::new(&format!("http://{}", addr));

        store.ping().await.unwrap();
    }

    #[tokio::test]
    async fn test_http_store_unreachable_is_an_error() {
        // Reserve a port, then drop the listener so nothing answers on it.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let store =
            HttpCounterStore::with_timeout(&format!("http://{}", addr), Duration::from_millis(200));

        assert!(store.incr("visits:total").await.is_err());
        assert!(store.get("visits:total").await.is_err());
        assert!(store.ping().await.is_err());
    }
}
