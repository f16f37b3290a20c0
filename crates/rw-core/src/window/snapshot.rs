use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::rolling::WorkingSet;

/// Read-only view of the working set published once per tick.
///
/// Cloning is cheap; every clone observes the same complete set.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Monotonic publication counter. `0` is the empty snapshot readers see
    /// before the initial population.
    pub seq: u64,
    pub published_at: DateTime<Utc>,
    pub working_set: Arc<WorkingSet>,
}

impl Snapshot {
    pub fn new(seq: u64, published_at: DateTime<Utc>, working_set: Arc<WorkingSet>) -> Self {
        Self {
            seq,
            published_at,
            working_set,
        }
    }

    /// The snapshot readers see before the first tick.
    pub fn empty() -> Self {
        Self::new(0, DateTime::<Utc>::MIN_UTC, Arc::new(WorkingSet::empty()))
    }

    pub fn len(&self) -> usize {
        self.working_set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.working_set.is_empty()
    }
}
