//! Internal frame ticker
//!
//! # Design
//!
//! One ticker task lives from `start` to `stop`. Frame-rate changes and
//! restarts are pushed to it over a `watch` channel, so the task is never
//! respawned from inside its own tick. Stopping is done by dropping the
//! [`TickerHandle`]: that closes the channel the task selects on, so stop
//! never blocks and never waits for an in-flight tick.
//!
//! When no runtime is available on the calling thread the ticker runs on a
//! dedicated thread with its own current-thread runtime.
//!
//! The task owns a guard that clears the handle's `alive` flag when the
//! task ends for any reason, including its runtime shutting down.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::{Builder, Handle};
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Running ticker; dropping it stops the ticker
pub(crate) struct TickerHandle {
    period_tx: watch::Sender<Duration>,
    alive: Arc<AtomicBool>,
}

impl TickerHandle {
    pub(crate) fn period(&self) -> Duration {
        *self.period_tx.borrow()
    }

    /// Restart the interval at `fps`, even if the rate is unchanged
    pub(crate) fn restart(&self, fps: u32) {
        self.period_tx.send_replace(period_for(fps));
    }

    /// Whether the task is still scheduled
    pub(crate) fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}

struct AliveGuard(Arc<AtomicBool>);

impl Drop for AliveGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Time between ticks at `fps` (clamped to at least 1)
#[must_use]
pub(crate) fn period_for(fps: u32) -> Duration {
    Duration::from_secs(1) / fps.max(1)
}

/// Spawn a ticker calling `on_tick` every `1/fps` seconds
///
/// The ticker exits on its own when `on_tick` returns `false`.
pub(crate) fn spawn<F>(fps: u32, on_tick: F) -> Option<TickerHandle>
where
    F: FnMut() -> bool + Send + 'static,
{
    let period = period_for(fps);
    let (period_tx, period_rx) = watch::channel(period);
    let alive = Arc::new(AtomicBool::new(true));
    let task = run(period_rx, AliveGuard(Arc::clone(&alive)), on_tick);

    if let Ok(handle) = Handle::try_current() {
        handle.spawn(task);
    } else {
        tracing::debug!("No tokio runtime on this thread, ticker runs on its own thread");
        let spawned = std::thread::Builder::new()
            .name("animator-ticker".to_string())
            .spawn(move || match Builder::new_current_thread().enable_time().build() {
                Ok(rt) => rt.block_on(task),
                Err(e) => tracing::error!(error = %e, "Failed to build ticker runtime"),
            });
        if let Err(e) = spawned {
            tracing::error!(error = %e, "Failed to spawn ticker thread");
            return None;
        }
    }

    tracing::debug!(fps, period_ms = period.as_millis(), "Ticker started");
    Some(TickerHandle { period_tx, alive })
}

fn interval_for(period: Duration) -> Interval {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

async fn run<F>(mut period_rx: watch::Receiver<Duration>, _alive: AliveGuard, mut on_tick: F)
where
    F: FnMut() -> bool,
{
    let mut interval = interval_for(*period_rx.borrow_and_update());

    loop {
        tokio::select! {
            changed = period_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let period = *period_rx.borrow_and_update();
                tracing::trace!(period_ms = period.as_millis(), "Ticker restarted");
                interval = interval_for(period);
            }
            _ = interval.tick() => {
                if !on_tick() {
                    break;
                }
            }
        }
    }
    tracing::debug!("Ticker stopped");
}
