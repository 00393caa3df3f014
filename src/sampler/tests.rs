//! Load Distribution Sampler Tests
//!
//! Validates observation recording and the distribution anomaly flag.
//!
//! ## Test Scopes
//! - **Attribution**: each sample is attributed to the instance named in the
//!   response body, in request order.
//! - **Failure isolation**: a failed request is recorded at its index and the
//!   run continues.
//! - **Anomaly flag**: a run where every answer came from one identity is
//!   flagged; a properly distributed run is not.

#[cfg(test)]
mod tests {
    use crate::accounting::protocol::{now_ms, VisitResponse};
    use crate::sampler::service::LoadSampler;
    use crate::sampler::types::SampleOutcome;
    use axum::extract::Extension;
    use axum::routing::get;
    use axum::{Json, Router};
    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn quick_sampler(samples: u32) -> LoadSampler {
        LoadSampler::new(
            samples,
            Duration::from_millis(1),
            Duration::from_millis(500),
        )
    }

    fn visit_body(instance_id: &str, request_number: u64) -> VisitResponse {
        VisitResponse {
            message: format!("Hello from instance {}", instance_id),
            instance_id: instance_id.to_string(),
            session_id: "session".to_string(),
            request_number,
            timestamp: now_ms(),
            hostname: "host".to_string(),
            user_agent: "test".to_string(),
            store_available: true,
            stats: None,
        }
    }

    /// Spawns an entry point that answers with the given instance identities
    /// in round-robin order, standing in for a balancer over the tier.
    async fn spawn_entry_point(identities: &'static [&'static str]) -> SocketAddr {
        let seen = Arc::new(AtomicU32::new(0));

        async fn handler(
            Extension((seen, identities)): Extension<(Arc<AtomicU32>, &'static [&'static str])>,
        ) -> Json<VisitResponse> {
            let request = seen.fetch_add(1, Ordering::SeqCst);
            let identity = identities[request as usize % identities.len()];
            Json(visit_body(identity, request as u64 + 1))
        }

        let app = Router::new()
            .route("/", get(handler))
            .layer(Extension((seen, identities)));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        tokio::time::sleep(Duration::from_millis(50)).await;

        addr
    }

    #[tokio::test]
    async fn test_distributed_run_sees_both_instances() {
        let addr = spawn_entry_point(&["1", "2"]).await;
        let sampler = quick_sampler(10);

        let run = sampler.run(&format!("http://{}/", addr)).await;

        assert_eq!(run.observations.len(), 10);
        assert_eq!(run.successes(), 10);
        assert_eq!(run.distinct_instances(), vec!["1".to_string(), "2".to_string()]);
        assert!(!run.is_skewed());

        // Observations stay in request order.
        let indexes: Vec<u32> = run.observations.iter().map(|o| o.index).collect();
        assert_eq!(indexes, (1..=10).collect::<Vec<u32>>());
    }

    #[tokio::test]
    async fn test_single_identity_run_is_flagged_as_anomaly() {
        let addr = spawn_entry_point(&["1"]).await;
        let sampler = quick_sampler(10);

        let run = sampler.run(&format!("http://{}/", addr)).await;

        assert_eq!(run.successes(), 10);
        assert_eq!(run.distinct_instances(), vec!["1".to_string()]);
        assert!(run.is_skewed(), "All samples on one instance is an anomaly");
    }

    #[tokio::test]
    async fn test_failures_are_recorded_and_do_not_abort_the_run() {
        // Reserve a port, then drop the listener so every request is refused.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let sampler = quick_sampler(5);
        let run = sampler.run(&format!("http://{}/", addr)).await;

        assert_eq!(run.observations.len(), 5, "Failures must not cut the run short");
        assert_eq!(run.successes(), 0);
        assert!(run.distinct_instances().is_empty());
        assert!(
            !run.is_skewed(),
            "An all-failed run says nothing about distribution"
        );

        for obs in &run.observations {
            assert!(matches!(obs.outcome, SampleOutcome::Failed { .. }));
        }
    }

    #[tokio::test]
    async fn test_unparsable_body_is_a_recorded_failure() {
        let app = Router::new().route("/", get(|| async { "not json" }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        tokio::time::sleep(Duration::from_millis(50)).await;

        let sampler = quick_sampler(2);
        let run = sampler.run(&format!("http://{}/", addr)).await;

        assert_eq!(run.observations.len(), 2);
        assert_eq!(run.successes(), 0);
    }
}
