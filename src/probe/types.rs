/// Result of a single probe request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The target answered with a success status.
    Success(u16),
    /// Timeout, connection error, or non-success status.
    Failed(String),
}

/// One attempt in a readiness run, kept for reporting only.
#[derive(Debug, Clone)]
pub struct ProbeAttempt {
    /// 1-based attempt number within the run.
    pub attempt: u32,
    pub outcome: ProbeOutcome,
    pub timestamp_ms: u64,
}

/// Terminal state of a readiness run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    /// The target answered successfully at this attempt; later attempts were skipped.
    Ready { attempt: u32 },
    /// Every attempt failed. Not escalated here; the caller decides what to do.
    Exhausted { attempts: u32 },
}

/// Full record of one readiness run against one target.
#[derive(Debug)]
pub struct ReadinessReport {
    pub target: String,
    pub readiness: Readiness,
    pub attempts: Vec<ProbeAttempt>,
}

impl ReadinessReport {
    pub fn is_ready(&self) -> bool {
        matches!(self.readiness, Readiness::Ready { .. })
    }
}
