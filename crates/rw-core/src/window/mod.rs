mod rolling;
mod snapshot;

pub use rolling::{RollingWindow, TickReport, WorkingSet};
pub use snapshot::Snapshot;
