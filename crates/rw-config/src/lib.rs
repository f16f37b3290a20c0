pub mod feed;
pub mod logging;
pub mod map;
pub mod roadwatch;
pub mod snapshot;
pub mod types;
mod validate;

pub use feed::FeedConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use map::MapConfig;
pub use roadwatch::{RoadwatchConfig, resolve_path};
pub use snapshot::SnapshotConfig;
pub use types::{HumanDuration, UtcOffset};
