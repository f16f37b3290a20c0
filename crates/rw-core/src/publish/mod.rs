mod jsonl;

pub use jsonl::{JsonlSnapshotSink, SnapshotLine};

use crate::error::CoreResult;
use crate::window::Snapshot;

/// Consumer of published working-set snapshots.
///
/// Subscribers run inline on the scheduler's tick, in registration order,
/// after the snapshot has been committed. A failing subscriber never rolls
/// the snapshot back.
pub trait FeedSubscriber: Send {
    fn name(&self) -> &str;

    fn publish(&mut self, snapshot: &Snapshot) -> CoreResult<()>;

    /// Called once when the feed stops.
    fn close(&mut self) -> CoreResult<()> {
        Ok(())
    }
}

impl<S: FeedSubscriber + ?Sized> FeedSubscriber for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn publish(&mut self, snapshot: &Snapshot) -> CoreResult<()> {
        (**self).publish(snapshot)
    }

    fn close(&mut self) -> CoreResult<()> {
        (**self).close()
    }
}
