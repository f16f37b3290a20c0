mod bootstrap;
mod signal;
mod types;

use std::path::Path;
use std::sync::Arc;

use orion_error::op_context;
use orion_error::prelude::*;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use rw_config::RoadwatchConfig;
use rw_core::clock::Clock;
use rw_core::generator::IncidentGenerator;
use rw_core::publish::FeedSubscriber;
use rw_core::window::{RollingWindow, Snapshot};

use crate::error::RuntimeResult;
use crate::scheduler::{FeedScheduler, FeedSettings};

pub use signal::wait_for_signal;

use bootstrap::{build_subscribers, load_catalog, random_source, system_clock};
use types::TaskGroup;

/// Overrides applied on top of a [`RoadwatchConfig`] at start.
#[derive(Default)]
pub struct EngineOptions {
    /// Replaces the system clock derived from `feed.utc_offset`.
    pub clock: Option<Arc<dyn Clock>>,
    /// Appended after the built-in subscribers.
    pub subscribers: Vec<Box<dyn FeedSubscriber>>,
}

// ---------------------------------------------------------------------------
// FeedEngine
// ---------------------------------------------------------------------------

/// Top-level lifecycle handle: bootstrap, run, graceful shutdown.
///
/// The engine owns one task group, the feed scheduler. Consumers observe
/// the feed through [`subscribe`](Self::subscribe) or through the
/// subscribers passed in [`EngineOptions`].
pub struct FeedEngine {
    cancel: CancellationToken,
    groups: Vec<TaskGroup>,
    snapshots: watch::Receiver<Arc<Snapshot>>,
}

impl FeedEngine {
    /// Bootstrap from a [`RoadwatchConfig`] and the directory relative
    /// paths in it are resolved against.
    pub async fn start(config: RoadwatchConfig, base_dir: &Path) -> RuntimeResult<Self> {
        Self::start_with(config, base_dir, EngineOptions::default()).await
    }

    #[tracing::instrument(
        name = "engine.start",
        skip_all,
        fields(tick = %config.feed.tick_interval, retention = %config.feed.retention)
    )]
    pub async fn start_with(
        config: RoadwatchConfig,
        base_dir: &Path,
        options: EngineOptions,
    ) -> RuntimeResult<Self> {
        let mut op = op_context!("engine-bootstrap").with_auto_log();
        op.record("base_dir", base_dir.display().to_string().as_str());

        let cancel = CancellationToken::new();

        // Phase 1: catalog, clock, randomness, subscribers
        let catalog = Arc::new(load_catalog(&config.feed, base_dir)?);
        let clock = match options.clock {
            Some(clock) => clock,
            None => system_clock(&config.feed)?,
        };
        let rng = random_source(config.feed.seed);
        let mut subscribers = build_subscribers(&config, base_dir)?;
        subscribers.extend(options.subscribers);
        rw_info!(
            sys,
            regions = catalog.len(),
            subscribers = subscribers.len(),
            "engine bootstrap complete"
        );

        // Phase 2: spawn the scheduler
        let (snapshot_tx, snapshots) = watch::channel(Arc::new(Snapshot::empty()));
        let scheduler = FeedScheduler::new(
            IncidentGenerator::new(catalog),
            RollingWindow::new(config.feed.retention.as_duration(), config.feed.min_capacity),
            clock,
            rng,
            FeedSettings {
                tick_interval: config.feed.tick_interval.as_duration(),
                max_new_per_tick: config.feed.max_new_per_tick,
            },
            subscribers,
            snapshot_tx,
            cancel.child_token(),
        );
        let mut feed = TaskGroup::new("feed");
        feed.push(tokio::spawn(scheduler.run()));

        op.mark_suc();
        Ok(Self {
            cancel,
            groups: vec![feed],
            snapshots,
        })
    }

    /// A receiver that always holds the latest published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.snapshots.clone()
    }

    /// The latest published snapshot.
    pub fn latest(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshots.borrow())
    }

    /// Request graceful shutdown. A tick already running completes; no new
    /// tick starts.
    pub fn shutdown(&self) {
        rw_info!(sys, "initiating graceful shutdown");
        self.cancel.cancel();
    }

    /// Wait for all task groups to finish, in reverse start order.
    pub async fn wait(mut self) -> RuntimeResult<()> {
        while let Some(group) = self.groups.pop() {
            let name = group.name;
            rw_debug!(sys, task_group = name, "waiting for task group to finish");
            group.wait().await?;
            rw_debug!(sys, task_group = name, "task group finished");
        }
        Ok(())
    }

    /// Clone of the root cancellation token.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}
