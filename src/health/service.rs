use std::sync::Arc;
use std::time::Duration;

use crate::accounting::protocol::ENDPOINT_HEALTH;
use crate::store::CounterStore;

use super::types::{HealthSummary, InstanceTarget, TargetKind, TargetReport, TargetStatus};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Probes every target in the deployment independently.
pub struct HealthAggregator {
    http_client: reqwest::Client,
    request_timeout: Duration,
    proxy_url: String,
    instances: Vec<InstanceTarget>,
    store: Arc<dyn CounterStore>,
}

impl HealthAggregator {
    pub fn new(
        proxy_url: &str,
        instances: Vec<InstanceTarget>,
        store: Arc<dyn CounterStore>,
    ) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            proxy_url: proxy_url.trim_end_matches('/').to_string(),
            instances,
            store,
        }
    }

    /// Runs every probe to completion and returns one report per target.
    /// A failing probe never blocks or skips the others.
    pub async fn run(&self) -> HealthSummary {
        let mut reports = Vec::with_capacity(self.instances.len() + 2);

        reports.push(
            self.probe_http("proxy", TargetKind::Proxy, &self.proxy_url)
                .await,
        );

        for target in &self.instances {
            let url = format!("{}{}", target.base_url.trim_end_matches('/'), ENDPOINT_HEALTH);
            reports.push(
                self.probe_http(
                    &format!("instance-{}", target.instance_id),
                    TargetKind::Instance,
                    &url,
                )
                .await,
            );
        }

        reports.push(self.probe_store().await);

        for report in &reports {
            tracing::info!(
                "[{:?}] {}: {:?} ({})",
                report.kind,
                report.name,
                report.status,
                report.detail
            );
        }

        HealthSummary { reports }
    }

    async fn probe_http(&self, name: &str, kind: TargetKind, url: &str) -> TargetReport {
        let response = self
            .http_client
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await;

        let (status, detail) = match response {
            Ok(resp) if resp.status().is_success() => {
                (TargetStatus::Healthy, format!("status {}", resp.status()))
            }
            Ok(resp) => (TargetStatus::Unhealthy, format!("status {}", resp.status())),
            Err(e) if e.is_timeout() => (TargetStatus::Unhealthy, "timeout".to_string()),
            // Transport-level failure: the probe could not be dispatched at all.
            Err(e) => (TargetStatus::Unknown, e.to_string()),
        };

        TargetReport {
            name: name.to_string(),
            kind,
            status,
            detail,
        }
    }

    async fn probe_store(&self) -> TargetReport {
        let (status, detail) = match self.store.ping().await {
            Ok(()) => (TargetStatus::Healthy, "ping ok".to_string()),
            Err(e) => (TargetStatus::Unhealthy, e.to_string()),
        };

        TargetReport {
            name: "store".to_string(),
            kind: TargetKind::Store,
            status,
            detail,
        }
    }
}
