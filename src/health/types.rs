/// Per-target probe verdict.
///
/// `Unknown` means the probe itself could not be executed (the target was
/// unreachable at the transport level) and must not be conflated with a probe
/// that ran and failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetStatus {
    Healthy,
    Unhealthy,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Proxy,
    Instance,
    Store,
}

/// One application instance reachable directly, bypassing the balancer.
#[derive(Debug, Clone)]
pub struct InstanceTarget {
    pub instance_id: String,
    /// Base URL of the instance's own HTTP surface.
    pub base_url: String,
}

/// Outcome of one probe.
#[derive(Debug, Clone)]
pub struct TargetReport {
    pub name: String,
    pub kind: TargetKind,
    pub status: TargetStatus,
    pub detail: String,
}

/// All probe outcomes of one aggregation run, one report per target.
#[derive(Debug)]
pub struct HealthSummary {
    pub reports: Vec<TargetReport>,
}

impl HealthSummary {
    pub fn all_healthy(&self) -> bool {
        self.reports
            .iter()
            .all(|report| report.status == TargetStatus::Healthy)
    }

    pub fn status_of(&self, name: &str) -> Option<TargetStatus> {
        self.reports
            .iter()
            .find(|report| report.name == name)
            .map(|report| report.status)
    }
}
