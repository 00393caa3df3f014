use std::time::Duration;

use crate::accounting::protocol::{now_ms, VisitResponse};

use super::types::{Observation, SampleOutcome, SampleRun};

const DEFAULT_SAMPLES: u32 = 10;
const DEFAULT_DELAY: Duration = Duration::from_millis(500);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Issues a fixed number of sequential requests through the shared entry
/// point and records which instance answered each one.
pub struct LoadSampler {
    http_client: reqwest::Client,
    samples: u32,
    delay: Duration,
    request_timeout: Duration,
}

impl Default for LoadSampler {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLES, DEFAULT_DELAY, DEFAULT_REQUEST_TIMEOUT)
    }
}

impl LoadSampler {
    pub fn new(samples: u32, delay: Duration, request_timeout: Duration) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            samples,
            delay,
            request_timeout,
        }
    }

    /// Runs one sampling pass. Strictly sequential: each request completes,
    /// including the fixed delay, before the next is issued.
    pub async fn run(&self, entry_point: &str) -> SampleRun {
        let mut observations = Vec::with_capacity(self.samples as usize);

        for index in 1..=self.samples {
            let outcome = self.sample_once(entry_point).await;

            match &outcome {
                SampleOutcome::Served { instance_id } => {
                    tracing::info!(
                        "Sample {}/{} served by instance {}",
                        index,
                        self.samples,
                        instance_id
                    );
                }
                SampleOutcome::Failed { reason } => {
                    tracing::warn!("Sample {}/{} failed: {}", index, self.samples, reason);
                }
            }

            observations.push(Observation {
                index,
                outcome,
                timestamp_ms: now_ms(),
            });

            if index < self.samples {
                tokio::time::sleep(self.delay).await;
            }
        }

        SampleRun {
            entry_point: entry_point.to_string(),
            observations,
        }
    }

    async fn sample_once(&self, entry_point: &str) -> SampleOutcome {
        let response = self
            .http_client
            .get(entry_point)
            .timeout(self.request_timeout)
            .send()
            .await;

        let response = match response {
            Ok(resp) => resp,
            Err(e) if e.is_timeout() => {
                return SampleOutcome::Failed {
                    reason: "timeout".to_string(),
                }
            }
            Err(e) => {
                return SampleOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        if !response.status().is_success() {
            return SampleOutcome::Failed {
                reason: format!("status {}", response.status()),
            };
        }

        match response.json::<VisitResponse>().await {
            Ok(body) => SampleOutcome::Served {
                instance_id: body.instance_id,
            },
            Err(e) => SampleOutcome::Failed {
                reason: format!("unparsable body: {}", e),
            },
        }
    }
}
