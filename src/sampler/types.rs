use std::collections::BTreeSet;

/// What happened for one sample index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleOutcome {
    /// The entry point answered and named the serving instance.
    Served { instance_id: String },
    /// Timeout, connection error, non-success status, or an unparsable body.
    Failed { reason: String },
}

/// One observation in a sampling run, in request order.
#[derive(Debug, Clone)]
pub struct Observation {
    /// 1-based sample index.
    pub index: u32,
    pub outcome: SampleOutcome,
    pub timestamp_ms: u64,
}

/// Ordered observation log of one sampling run.
#[derive(Debug)]
pub struct SampleRun {
    pub entry_point: String,
    pub observations: Vec<Observation>,
}

impl SampleRun {
    /// Distinct instance identities seen across successful observations.
    pub fn distinct_instances(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self
            .observations
            .iter()
            .filter_map(|obs| match &obs.outcome {
                SampleOutcome::Served { instance_id } => Some(instance_id.as_str()),
                SampleOutcome::Failed { .. } => None,
            })
            .collect();

        set.into_iter().map(|s| s.to_string()).collect()
    }

    pub fn successes(&self) -> usize {
        self.observations
            .iter()
            .filter(|obs| matches!(obs.outcome, SampleOutcome::Served { .. }))
            .count()
    }

    /// Distribution anomaly flag: every successful sample mapped to a single
    /// instance identity. Meaningless without successes, so an all-failed run
    /// is not flagged.
    pub fn is_skewed(&self) -> bool {
        self.successes() > 0 && self.distinct_instances().len() == 1
    }
}
