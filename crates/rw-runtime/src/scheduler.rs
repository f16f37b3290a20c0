use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use orion_error::prelude::*;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use rw_core::clock::Clock;
use rw_core::generator::{IncidentGenerator, RandomSource, base_incident_count, tick_batch_size};
use rw_core::publish::FeedSubscriber;
use rw_core::window::{RollingWindow, Snapshot, TickReport, WorkingSet};

use crate::error::{RuntimeReason, RuntimeResult};

/// Construction parameters for [`FeedScheduler`].
pub struct FeedSettings {
    pub tick_interval: Duration,
    pub max_new_per_tick: u32,
}

/// Drives generation and aggregation on a fixed cadence and publishes each
/// resulting working set.
///
/// One task owns the scheduler, so ticks never overlap. Each tick replaces
/// the working set wholesale, then hands the new [`Snapshot`] to the watch
/// channel and to every subscriber in registration order.
pub struct FeedScheduler {
    generator: IncidentGenerator,
    window: RollingWindow,
    clock: Arc<dyn Clock>,
    rng: Box<dyn RandomSource + Send>,
    settings: FeedSettings,
    subscribers: Vec<Box<dyn FeedSubscriber>>,
    snapshot_tx: watch::Sender<Arc<Snapshot>>,
    cancel: CancellationToken,
    current: Arc<WorkingSet>,
    seq: u64,
}

impl FeedScheduler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        generator: IncidentGenerator,
        window: RollingWindow,
        clock: Arc<dyn Clock>,
        rng: Box<dyn RandomSource + Send>,
        settings: FeedSettings,
        subscribers: Vec<Box<dyn FeedSubscriber>>,
        snapshot_tx: watch::Sender<Arc<Snapshot>>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            generator,
            window,
            clock,
            rng,
            settings,
            subscribers,
            snapshot_tx,
            cancel,
            current: Arc::new(WorkingSet::empty()),
            seq: 0,
        }
    }

    /// Populate once immediately, then tick every `tick_interval` until
    /// cancelled.
    ///
    /// Cancellation is checked before every tick, so once it is observed no
    /// further tick runs. A tick already executing always completes.
    /// Subscribers are closed on exit.
    #[tracing::instrument(name = "feed", skip_all)]
    pub async fn run(mut self) -> RuntimeResult<()> {
        let period = self.settings.tick_interval;
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let cancel = self.cancel.clone();
        if !cancel.is_cancelled() {
            self.populate();
        }
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => self.tick(),
            }
        }
        self.close_subscribers()
    }

    /// Initial population sized by the base incident count.
    fn populate(&mut self) {
        let now = self.clock.now();
        let base = base_incident_count(&now, &mut *self.rng);
        rw_debug!(feed, base_count = base, "initial population");
        self.advance(base, base);
    }

    /// One periodic tick: a batch of `max(1, floor(u * max_new))` incidents.
    fn tick(&mut self) {
        let batch = tick_batch_size(&mut *self.rng, self.settings.max_new_per_tick);
        let now = self.clock.now();
        let base = base_incident_count(&now, &mut *self.rng);
        self.advance(batch, base);
    }

    fn advance(&mut self, batch: usize, base_count: usize) {
        let now = self.clock.now();
        let fresh = match self.generator.generate(batch as i64, now, &mut *self.rng) {
            Ok(fresh) => fresh,
            Err(e) => {
                rw_error!(feed, error = %e, batch, "incident generation failed");
                return;
            }
        };
        let now_utc = now.with_timezone(&Utc);
        let (next, report) = self.window.tick(&self.current, fresh, now_utc, base_count);
        self.publish(next, now_utc, report);
    }

    fn publish(&mut self, next: WorkingSet, published_at: DateTime<Utc>, report: TickReport) {
        self.seq += 1;
        let working_set = Arc::new(next);
        self.current = Arc::clone(&working_set);
        let snapshot = Arc::new(Snapshot::new(self.seq, published_at, working_set));

        self.snapshot_tx.send_replace(Arc::clone(&snapshot));
        rw_info!(
            feed,
            seq = snapshot.seq,
            active = snapshot.len(),
            added = report.added,
            evicted = report.evicted,
            truncated = report.truncated,
            capacity = report.capacity,
            last_update = %published_at.to_rfc3339(),
            "snapshot published"
        );

        for subscriber in &mut self.subscribers {
            if let Err(e) = subscriber.publish(&snapshot) {
                rw_warn!(res, subscriber = subscriber.name(), seq = snapshot.seq, error = %e, "subscriber failed");
            }
        }
    }

    fn close_subscribers(&mut self) -> RuntimeResult<()> {
        let mut failed = Vec::new();
        for subscriber in &mut self.subscribers {
            match subscriber.close() {
                Ok(()) => rw_debug!(res, subscriber = subscriber.name(), "subscriber closed"),
                Err(e) => {
                    rw_warn!(res, subscriber = subscriber.name(), error = %e, "subscriber close failed");
                    failed.push(subscriber.name().to_string());
                }
            }
        }
        if failed.is_empty() {
            Ok(())
        } else {
            StructError::from(RuntimeReason::Subscriber)
                .with_detail(format!("close failed: {}", failed.join(", ")))
                .err()
        }
    }

    /// Published snapshots so far.
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::{FixedOffset, TimeDelta};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rw_core::catalog::Catalog;
    use rw_core::clock::ManualClock;
    use rw_core::error::CoreResult;
    use rw_core::generator::ReplaySource;

    use super::*;

    /// Records the seq and size of every snapshot it sees.
    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<(u64, usize)>>>, Arc<Mutex<bool>>);

    impl FeedSubscriber for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }
        fn publish(&mut self, snapshot: &Snapshot) -> CoreResult<()> {
            self.0.lock().unwrap().push((snapshot.seq, snapshot.len()));
            Ok(())
        }
        fn close(&mut self) -> CoreResult<()> {
            *self.1.lock().unwrap() = true;
            Ok(())
        }
    }

    fn tuesday_rush() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2026-03-10T08:00:00-03:00").unwrap()
    }

    fn scheduler(
        clock: ManualClock,
        rng: Box<dyn RandomSource + Send>,
        subscribers: Vec<Box<dyn FeedSubscriber>>,
        cancel: CancellationToken,
    ) -> (FeedScheduler, watch::Receiver<Arc<Snapshot>>) {
        let (tx, rx) = watch::channel(Arc::new(Snapshot::empty()));
        let scheduler = FeedScheduler::new(
            IncidentGenerator::new(Arc::new(Catalog::builtin())),
            RollingWindow::default(),
            Arc::new(clock),
            rng,
            FeedSettings {
                tick_interval: Duration::from_secs(5),
                max_new_per_tick: 3,
            },
            subscribers,
            tx,
            cancel,
        );
        (scheduler, rx)
    }

    #[test]
    fn populate_uses_base_count() {
        let clock = ManualClock::new(tuesday_rush());
        // u = 0.5 at Tuesday 08:00 gives a base count of 30
        let (mut s, rx) = scheduler(
            clock,
            Box::new(ReplaySource::new([0.5])),
            Vec::new(),
            CancellationToken::new(),
        );
        s.populate();
        let snap = rx.borrow().clone();
        assert_eq!(snap.seq, 1);
        assert_eq!(snap.len(), 30);
    }

    #[test]
    fn tick_adds_one_or_two() {
        let clock = ManualClock::new(tuesday_rush());
        let (mut s, rx) = scheduler(
            clock.clone(),
            Box::new(StdRng::seed_from_u64(7)),
            Vec::new(),
            CancellationToken::new(),
        );
        s.populate();
        let mut previous = rx.borrow().len();
        for _ in 0..10 {
            clock.advance(TimeDelta::seconds(5));
            s.tick();
            let snap = rx.borrow().clone();
            let newest = snap.working_set.newest().unwrap();
            assert_eq!(newest, clock.now().with_timezone(&Utc));
            let fresh = snap
                .working_set
                .iter()
                .filter(|i| i.created_at == newest)
                .count();
            assert!((1..=2).contains(&fresh), "{fresh}");
            assert!(snap.len() <= previous + 2);
            previous = snap.len();
        }
        assert_eq!(s.seq(), 11);
    }

    #[test]
    fn subscribers_see_every_snapshot() {
        let clock = ManualClock::new(tuesday_rush());
        let recorder = Recorder::default();
        let (mut s, _rx) = scheduler(
            clock.clone(),
            Box::new(StdRng::seed_from_u64(3)),
            vec![Box::new(recorder.clone())],
            CancellationToken::new(),
        );
        s.populate();
        clock.advance(TimeDelta::seconds(5));
        s.tick();
        s.close_subscribers().unwrap();

        let seen = recorder.0.lock().unwrap().clone();
        assert_eq!(seen.iter().map(|(seq, _)| *seq).collect::<Vec<_>>(), vec![1, 2]);
        assert!(*recorder.1.lock().unwrap());
    }

    #[test]
    fn stale_incidents_leave_the_feed() {
        let clock = ManualClock::new(tuesday_rush());
        let (mut s, rx) = scheduler(
            clock.clone(),
            Box::new(StdRng::seed_from_u64(5)),
            Vec::new(),
            CancellationToken::new(),
        );
        s.populate();
        let first_wave = rx.borrow().working_set.oldest().unwrap();

        clock.advance(TimeDelta::minutes(31));
        s.tick();
        let snap = rx.borrow().clone();
        assert!(snap.working_set.iter().all(|i| i.created_at > first_wave));
        assert!((1..=2).contains(&snap.len()));
    }

    #[tokio::test(start_paused = true)]
    async fn run_ticks_on_cadence_until_cancelled() {
        let clock = ManualClock::new(tuesday_rush());
        let cancel = CancellationToken::new();
        let recorder = Recorder::default();
        let (s, mut rx) = scheduler(
            clock,
            Box::new(StdRng::seed_from_u64(11)),
            vec![Box::new(recorder.clone())],
            cancel.clone(),
        );
        let handle = tokio::spawn(s.run());

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().seq, 1);

        tokio::time::sleep(Duration::from_millis(12_500)).await;
        assert_eq!(rx.borrow().seq, 3);

        cancel.cancel();
        handle.await.unwrap().unwrap();
        let seen = recorder.0.lock().unwrap().len();
        assert_eq!(seen, 3);
        assert!(*recorder.1.lock().unwrap());

        // no ticks after cancellation
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(recorder.0.lock().unwrap().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_before_start_publishes_nothing() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let (s, rx) = scheduler(
            ManualClock::new(tuesday_rush()),
            Box::new(StdRng::seed_from_u64(1)),
            Vec::new(),
            cancel,
        );
        s.run().await.unwrap();
        assert_eq!(rx.borrow().seq, 0);
    }
}
