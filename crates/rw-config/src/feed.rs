use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::{HumanDuration, UtcOffset};

/// Feed engine settings, deserialized from `[feed]`.
///
/// Every field has a default, so the section may be omitted entirely.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Scheduler cadence between generation ticks.
    pub tick_interval: HumanDuration,
    /// Retention horizon; older incidents are evicted on the next tick.
    pub retention: HumanDuration,
    /// Lower bound of the working-set capacity (`max(base_count, min_capacity)`).
    pub min_capacity: usize,
    /// Per-tick batch size is `max(1, floor(u * max_new_per_tick))`.
    pub max_new_per_tick: u32,
    /// Fixed RNG seed for reproducible runs. Seeded from OS entropy when absent.
    pub seed: Option<u64>,
    /// Local wall-clock offset. System local time when absent.
    pub utc_offset: Option<UtcOffset>,
    /// Optional region catalog file; the built-in catalog is used otherwise.
    /// Relative paths resolve against the config file's directory.
    pub catalog: Option<PathBuf>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(5).into(),
            retention: Duration::from_secs(30 * 60).into(),
            min_capacity: 50,
            max_new_per_tick: 3,
            seed: None,
            utc_offset: None,
            catalog: None,
        }
    }
}
