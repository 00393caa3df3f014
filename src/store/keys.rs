//! Counter key naming shared by every instance.

/// Key of the global visit counter, incremented by every instance.
pub const GLOBAL_VISITS: &str = "visits:total";

const INSTANCE_PREFIX: &str = "visits:instance:";

/// Key of the per-instance visit counter for the given identity.
pub fn instance_visits(instance_id: &str) -> String {
    format!("{}{}", INSTANCE_PREFIX, instance_id)
}
