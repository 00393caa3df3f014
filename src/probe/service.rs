use std::time::Duration;

use crate::accounting::protocol::now_ms;

use super::types::{ProbeAttempt, ProbeOutcome, Readiness, ReadinessReport};

const DEFAULT_MAX_ATTEMPTS: u32 = 30;
const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Polls an HTTP endpoint until it answers successfully or the attempt
/// budget is spent.
pub struct ReadinessProber {
    http_client: reqwest::Client,
    max_attempts: u32,
    interval: Duration,
    request_timeout: Duration,
}

impl Default for ReadinessProber {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_INTERVAL, DEFAULT_REQUEST_TIMEOUT)
    }
}

impl ReadinessProber {
    pub fn new(max_attempts: u32, interval: Duration, request_timeout: Duration) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            max_attempts,
            interval,
            request_timeout,
        }
    }

    /// Runs one full readiness sequence against `target`.
    ///
    /// Returns at the first successful attempt; otherwise performs exactly
    /// `max_attempts` attempts and reports `Exhausted`.
    pub async fn wait_ready(&self, target: &str) -> ReadinessReport {
        let mut attempts = Vec::new();

        for attempt in 1..=self.max_attempts {
            let outcome = self.probe_once(target).await;
            let succeeded = matches!(outcome, ProbeOutcome::Success(_));

            match &outcome {
                ProbeOutcome::Success(status) => {
                    tracing::info!(
                        "{} ready after attempt {}/{} (status {})",
                        target,
                        attempt,
                        self.max_attempts,
                        status
                    );
                }
                ProbeOutcome::Failed(reason) => {
                    tracing::debug!(
                        "{} not ready, attempt {}/{}: {}",
                        target,
                        attempt,
                        self.max_attempts,
                        reason
                    );
                }
            }

            attempts.push(ProbeAttempt {
                attempt,
                outcome,
                timestamp_ms: now_ms(),
            });

            if succeeded {
                return ReadinessReport {
                    target: target.to_string(),
                    readiness: Readiness::Ready { attempt },
                    attempts,
                };
            }

            if attempt < self.max_attempts {
                tokio::time::sleep(self.interval).await;
            }
        }

        tracing::warn!(
            "{} never became ready after {} attempts",
            target,
            self.max_attempts
        );

        ReadinessReport {
            target: target.to_string(),
            readiness: Readiness::Exhausted {
                attempts: self.max_attempts,
            },
            attempts,
        }
    }

    async fn probe_once(&self, target: &str) -> ProbeOutcome {
        let response = self
            .http_client
            .get(target)
            .timeout(self.request_timeout)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => ProbeOutcome::Success(resp.status().as_u16()),
            Ok(resp) => ProbeOutcome::Failed(format!("status {}", resp.status())),
            Err(e) if e.is_timeout() => ProbeOutcome::Failed("timeout".to_string()),
            Err(e) => ProbeOutcome::Failed(e.to_string()),
        }
    }
}
