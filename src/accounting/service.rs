use anyhow::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::store::keys::{instance_visits, GLOBAL_VISITS};
use crate::store::CounterStore;

use super::protocol::{InstanceCount, VisitStats};

/// Outcome of recording one visit.
#[derive(Debug)]
pub struct VisitRecord {
    /// Requests served by this process since startup or the last reset.
    pub request_number: u64,
    pub store_available: bool,
    /// Present only when both store increments succeeded.
    pub stats: Option<VisitStats>,
}

/// Read-only counter view for one instance.
#[derive(Debug)]
pub struct StatsSnapshot {
    pub local_requests: u64,
    pub store_available: bool,
    pub global_total: Option<u64>,
    pub instances: Vec<InstanceCount>,
}

/// Timing sample produced by the synthetic load operation.
#[derive(Debug)]
pub struct LoadSample {
    pub elapsed_ms: u64,
    pub result: f64,
}

/// Per-process request accounting, constructed once at startup.
///
/// Owns the local tally and session id exclusively; all shared state lives in
/// the injected counter store. The known-instances set drives the stats
/// aggregation and the reset scope, and always contains this instance's own
/// identity.
pub struct AccountingService {
    pub instance_id: String,
    pub session_id: String,
    pub hostname: String,
    known_instances: Vec<String>,
    local_tally: AtomicU64,
    store: Arc<dyn CounterStore>,
}

impl AccountingService {
    pub fn new(
        instance_id: &str,
        peers: Vec<String>,
        hostname: &str,
        store: Arc<dyn CounterStore>,
    ) -> Arc<Self> {
        let mut known_instances = vec![instance_id.to_string()];
        for peer in peers {
            if !known_instances.contains(&peer) {
                known_instances.push(peer);
            }
        }

        Arc::new(Self {
            instance_id: instance_id.to_string(),
            session_id: Uuid::new_v4().to_string(),
            hostname: hostname.to_string(),
            known_instances,
            local_tally: AtomicU64::new(0),
            store,
        })
    }

    /// Records one inbound visit.
    ///
    /// The local tally is bumped unconditionally; the global and per-instance
    /// counters are incremented in the shared store. A store failure degrades
    /// the record instead of failing it.
    pub async fn record_visit(&self) -> VisitRecord {
        let request_number = self.local_tally.fetch_add(1, Ordering::SeqCst) + 1;

        let global = self.store.incr(GLOBAL_VISITS).await;
        let instance = self.store.incr(&instance_visits(&self.instance_id)).await;

        match (global, instance) {
            (Ok(global_total), Ok(instance_total)) => VisitRecord {
                request_number,
                store_available: true,
                stats: Some(VisitStats {
                    global_total,
                    instance_total,
                }),
            },
            (global, instance) => {
                let err = global.err().or(instance.err());
                tracing::warn!(
                    "Counter store unavailable, serving degraded visit response: {:?}",
                    err
                );

                VisitRecord {
                    request_number,
                    store_available: false,
                    stats: None,
                }
            }
        }
    }

    /// Reads the current counter view without mutating anything.
    ///
    /// Counters that were never incremented read as zero; only a store-level
    /// failure marks the snapshot degraded.
    pub async fn stats(&self) -> StatsSnapshot {
        let local_requests = self.local_tally.load(Ordering::SeqCst);

        match self.read_counters().await {
            Ok((global_total, instances)) => StatsSnapshot {
                local_requests,
                store_available: true,
                global_total: Some(global_total),
                instances,
            },
            Err(e) => {
                tracing::warn!("Counter store unavailable, serving degraded stats: {}", e);

                StatsSnapshot {
                    local_requests,
                    store_available: false,
                    global_total: None,
                    instances: Vec::new(),
                }
            }
        }
    }

    async fn read_counters(&self) -> Result<(u64, Vec<InstanceCount>)> {
        let global_total = self.store.get(GLOBAL_VISITS).await?;

        let mut instances = Vec::with_capacity(self.known_instances.len());
        for instance_id in &self.known_instances {
            let visits = self.store.get(&instance_visits(instance_id)).await?;
            instances.push(InstanceCount {
                instance_id: instance_id.clone(),
                visits,
            });
        }

        Ok((global_total, instances))
    }

    /// Deletes every known counter and zeroes the local tally.
    ///
    /// Deleting an already-absent counter is a no-op at the store, so
    /// concurrent resets are idempotent.
    pub async fn reset(&self) -> Result<()> {
        self.store.del(GLOBAL_VISITS).await?;
        for instance_id in &self.known_instances {
            self.store.del(&instance_visits(instance_id)).await?;
        }

        self.local_tally.store(0, Ordering::SeqCst);

        tracing::info!("Counters reset by instance {}", self.instance_id);

        Ok(())
    }

    /// Runs a deterministic amount of CPU-bound work and reports its wall time.
    ///
    /// The work runs on the blocking pool so it saturates only this instance's
    /// spare CPU, never the runtime's I/O threads. No side effects beyond the
    /// timing measurement.
    pub async fn synthetic_load(&self, iterations: u64) -> Result<LoadSample> {
        let started = Instant::now();

        let result = tokio::task::spawn_blocking(move || {
            let mut acc = 0.0f64;
            for i in 0..iterations {
                acc += (i as f64).sqrt();
            }
            acc
        })
        .await?;

        Ok(LoadSample {
            elapsed_ms: started.elapsed().as_millis() as u64,
            result,
        })
    }
}
