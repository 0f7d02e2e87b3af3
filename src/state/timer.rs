//! Wall-clock anchored countdown and the task that drives its ticks.

use std::{
    sync::{Arc, Mutex, MutexGuard, Weak},
    time::Duration,
};

use tokio::{
    task::JoinHandle,
    time::{Instant, MissedTickBehavior, interval},
};
use tracing::trace;

/// Longest allowed interval between two ticks.
pub const MAX_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Receives countdown progress. Callbacks run outside the timer's lock.
pub trait TimerObserver: Send + Sync {
    /// Called on every tick and once synchronously on reset.
    fn on_tick(&self, remaining: Duration, duration: Duration);
    /// Called exactly once when the countdown reaches zero.
    fn on_done(&self);
}

/// Result of advancing a [`Countdown`] to a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub remaining: Duration,
    pub duration: Duration,
    /// True only on the tick that reached zero.
    pub expired: bool,
}

/// Pure countdown state; every method takes the current instant explicitly.
#[derive(Debug, Clone)]
pub struct Countdown {
    duration: Duration,
    remaining: Duration,
    started_at: Option<Instant>,
    /// Set when a cycle reached zero; only `reset` clears it.
    expired: bool,
}

impl Countdown {
    /// Idle countdown with `remaining == duration`.
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            remaining: duration,
            started_at: None,
            expired: false,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Begin or resume counting. Returns `false` when already running or already expired.
    ///
    /// A zero-length countdown starts too; its first tick expires it.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.is_running() || self.expired {
            return false;
        }
        let consumed = self.duration - self.remaining;
        // Anchor in the past so a resumed countdown continues from `remaining`.
        self.started_at = Some(now.checked_sub(consumed).unwrap_or(now));
        true
    }

    /// Recompute `remaining` from the anchor; stops itself on reaching zero.
    pub fn tick(&mut self, now: Instant) -> Option<Tick> {
        let started_at = self.started_at?;
        let elapsed = now.saturating_duration_since(started_at);
        // Never move backwards, even if the anchor was re-set around a pause.
        self.remaining = self.remaining.min(self.duration.saturating_sub(elapsed));

        let expired = self.remaining.is_zero();
        if expired {
            self.started_at = None;
            self.expired = true;
        }

        Some(Tick {
            remaining: self.remaining,
            duration: self.duration,
            expired,
        })
    }

    /// Stop counting and keep the precise remaining time. Idempotent.
    ///
    /// Returns the final tick when the countdown was running; it is `expired` if the
    /// deadline passed before the pause.
    pub fn pause(&mut self, now: Instant) -> Option<Tick> {
        let tick = self.tick(now)?;
        self.started_at = None;
        Some(tick)
    }

    /// Stop, optionally replace the duration, and refill.
    pub fn reset(&mut self, duration: Option<Duration>) -> Tick {
        self.started_at = None;
        self.expired = false;
        if let Some(duration) = duration {
            self.duration = duration;
        }
        self.remaining = self.duration;
        Tick {
            remaining: self.remaining,
            duration: self.duration,
            expired: false,
        }
    }
}

struct TimerInner {
    countdown: Countdown,
    generation: u64,
    task: Option<JoinHandle<()>>,
}

/// A [`Countdown`] driven by a tokio task at a fixed tick interval.
///
/// `pause` and `reset` bump a generation counter and abort the running task, so a
/// tick scheduled before the cancellation never reaches the observer.
#[derive(Clone)]
pub struct CountdownTimer {
    inner: Arc<Mutex<TimerInner>>,
    observer: Arc<dyn TimerObserver>,
    tick_interval: Duration,
}

impl CountdownTimer {
    /// Create an idle timer. `tick_interval` is capped at [`MAX_TICK_INTERVAL`].
    pub fn new(
        duration: Duration,
        tick_interval: Duration,
        observer: Arc<dyn TimerObserver>,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TimerInner {
                countdown: Countdown::new(duration),
                generation: 0,
                task: None,
            })),
            observer,
            tick_interval: tick_interval.clamp(Duration::from_millis(1), MAX_TICK_INTERVAL),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TimerInner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_running(&self) -> bool {
        self.lock().countdown.is_running()
    }

    pub fn remaining(&self) -> Duration {
        self.lock().countdown.remaining()
    }

    pub fn duration(&self) -> Duration {
        self.lock().countdown.duration()
    }

    /// Start ticking. No-op while running or after expiry without a reset.
    pub fn start(&self) {
        let mut inner = self.lock();
        if !inner.countdown.start(Instant::now()) {
            return;
        }
        inner.generation += 1;
        let generation = inner.generation;
        inner.task = Some(tokio::spawn(run_ticks(
            Arc::downgrade(&self.inner),
            self.observer.clone(),
            self.tick_interval,
            generation,
        )));
        trace!(generation, "countdown started");
    }

    /// Stop ticking without refilling. Idempotent.
    pub fn pause(&self) {
        let last = {
            let mut inner = self.lock();
            Self::cancel(&mut inner);
            inner.countdown.pause(Instant::now())
        };
        // The deadline passed before the tick task got to it: still complete exactly once.
        if let Some(tick) = last.filter(|tick| tick.expired) {
            self.observer.on_tick(tick.remaining, tick.duration);
            self.observer.on_done();
        }
    }

    /// Stop, optionally change the duration, refill and report the full duration at once.
    pub fn reset(&self, duration: Option<Duration>) {
        let tick = {
            let mut inner = self.lock();
            Self::cancel(&mut inner);
            inner.countdown.reset(duration)
        };
        self.observer.on_tick(tick.remaining, tick.duration);
    }

    fn cancel(inner: &mut TimerInner) {
        inner.generation += 1;
        if let Some(task) = inner.task.take() {
            task.abort();
        }
    }
}

impl Drop for TimerInner {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run_ticks(
    inner: Weak<Mutex<TimerInner>>,
    observer: Arc<dyn TimerObserver>,
    period: Duration,
    generation: u64,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick of a tokio interval completes immediately.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let tick = {
            // Every timer handle is gone: nobody is listening any more.
            let Some(inner) = inner.upgrade() else {
                return;
            };
            let mut guard = inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            if guard.generation != generation {
                return;
            }
            let Some(tick) = guard.countdown.tick(Instant::now()) else {
                return;
            };
            if tick.expired {
                guard.task = None;
            }
            tick
        };

        observer.on_tick(tick.remaining, tick.duration);
        if tick.expired {
            observer.on_done();
            return;
        }
    }
}
