use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;

use super::client::CounterStore;

/// In-memory counter store backed by a `DashMap`.
///
/// Increments go through the per-key entry lock, so concurrent callers
/// serialize exactly as they would against the real store. Used by tests and
/// by the single-process demo path when no remote store is configured.
#[derive(Default)]
pub struct MemoryCounterStore {
    counters: DashMap<String, u64>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn incr(&self, key: &str) -> Result<u64> {
        let mut entry = self.counters.entry(key.to_string()).or_insert(0);
        *entry += 1;
        Ok(*entry)
    }

    async fn get(&self, key: &str) -> Result<u64> {
        Ok(self.counters.get(key).map(|v| *v).unwrap_or(0))
    }

    async fn del(&self, key: &str) -> Result<()> {
        self.counters.remove(key);
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
