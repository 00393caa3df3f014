use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Access contract for the shared counter store.
///
/// The store is the only mutable resource shared between instances; everything
/// it holds is a named, monotonically increasing counter. Implementations must
/// increment atomically so that concurrent callers on the same key never lose
/// an update.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Atomically increments the counter and returns its new value.
    /// The counter is created at 1 if it did not exist.
    async fn incr(&self, key: &str) -> Result<u64>;

    /// Reads the current counter value. An absent counter reads as 0;
    /// `Err` means the store itself could not be reached.
    async fn get(&self, key: &str) -> Result<u64>;

    /// Deletes the counter. Deleting an absent counter is a no-op.
    async fn del(&self, key: &str) -> Result<()>;

    /// Liveness command against the store.
    async fn ping(&self) -> Result<()>;
}

/// Value payload returned by the key-value service for incr/get.
#[derive(Debug, Serialize, Deserialize)]
pub struct CounterValue {
    pub value: u64,
}

/// HTTP client for a remote key-value service.
///
/// Expects `POST /incr/{key}`, `GET /get/{key}`, `POST /del/{key}` and
/// `GET /ping`. Every call carries a fixed timeout; a timeout is reported as
/// a store failure for that call, not retried here.
pub struct HttpCounterStore {
    http_client: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
}

impl HttpCounterStore {
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, request_timeout: Duration) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout,
        }
    }

    fn url(&self, op: &str, key: &str) -> String {
        format!("{}/{}/{}", self.base_url, op, key)
    }
}

#[async_trait]
impl CounterStore for HttpCounterStore {
    async fn incr(&self, key: &str) -> Result<u64> {
        let response = self
            .http_client
            .post(self.url("incr", key))
            .timeout(self.request_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("incr {} failed with status {}", key, response.status());
        }

        let value: CounterValue = response.json().await?;
        Ok(value.value)
    }

    async fn get(&self, key: &str) -> Result<u64> {
        let response = self
            .http_client
            .get(self.url("get", key))
            .timeout(self.request_timeout)
            .send()
            .await?;

        // Absent counter reads as zero.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(0);
        }

        if !response.status().is_success() {
            anyhow::bail!("get {} failed with status {}", key, response.status());
        }

        let value: CounterValue = response.json().await?;
        Ok(value.value)
    }

    async fn del(&self, key: &str) -> Result<()> {
        let response = self
            .http_client
            .post(self.url("del", key))
            .timeout(self.request_timeout)
            .send()
            .await?;

        // Deleting an absent counter is still a successful delete.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }

        if !response.status().is_success() {
            anyhow::bail!("del {} failed with status {}", key, response.status());
        }

        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        let response = self
            .http_client
            .get(format!("{}/ping", self.base_url))
            .timeout(self.request_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("ping failed with status {}", response.status());
        }

        Ok(())
    }
}
