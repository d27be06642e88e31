//! Clock source and the recurring tick that drives re-rendering.
//!
//! The ticker runs as its own tokio task and hands the current time to the
//! receiver once per interval. Cancellation is explicit through
//! [`TickSubscription::cancel`]; dropping the subscription cancels as well.

use chrono::{Local, NaiveDateTime};
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Supplies the current wall-clock time
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> NaiveDateTime;
}

/// Commit timestamp for a new record: the clock reading, but never earlier
/// than `latest`, so timestamp order always matches commit order even when
/// the wall clock steps back
pub fn commit_stamp(clock: &dyn Clock, latest: Option<NaiveDateTime>) -> NaiveDateTime {
    let now = clock.now();
    match latest {
        Some(latest) if latest > now => latest,
        _ => now,
    }
}

/// Local system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock that only moves when told to
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub fn set(&self, now: NaiveDateTime) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = now;
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        if let Ok(mut guard) = self.now.lock() {
            *guard += by;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        match self.now.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Handle to a running ticker
#[derive(Debug)]
pub struct TickSubscription {
    handle: JoinHandle<()>,
}

impl TickSubscription {
    /// Stop the ticker. Ticks already buffered in the channel can still be received.
    pub fn cancel(&self) {
        if !self.handle.is_finished() {
            info!("Cancelling clock ticker");
        }
        self.handle.abort();
    }
}

impl Drop for TickSubscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Start delivering `clock.now()` every `interval`.
///
/// The first tick fires immediately. Ticks that fall behind are skipped rather
/// than bursted, since each one triggers a full re-render.
pub fn start_ticker(
    clock: Arc<dyn Clock>,
    interval: Duration,
) -> (TickSubscription, mpsc::Receiver<NaiveDateTime>) {
    let (sender, receiver) = mpsc::channel(8);

    info!("Starting clock ticker every {:?}", interval);
    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            if sender.send(clock.now()).await.is_err() {
                debug!("Tick receiver dropped, stopping ticker");
                break;
            }
        }
    });

    (TickSubscription { handle }, receiver)
}
