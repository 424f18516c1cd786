//! Cancelable one-second tick source.
//!
//! A [`Countdown`] is a spawned tokio task that sends a [`Tick`] every
//! period until it is dropped. Each countdown carries a generation number;
//! [`TickSource`] bumps the generation whenever it starts or stops one, so
//! a tick already sitting in the channel from an older countdown is
//! recognised as stale and discarded.

use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// One elapsed period from the countdown with the given generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
}

/// Handle to a running tick task. Dropping it stops the ticks.
#[derive(Debug)]
pub struct Countdown {
    handle: JoinHandle<()>,
}

impl Countdown {
    /// Spawn a countdown on the current tokio runtime.
    ///
    /// The first tick fires one full `period` after spawning.
    pub fn spawn(generation: u64, period: Duration, sender: UnboundedSender<Tick>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if sender.send(Tick { generation }).is_err() {
                    break;
                }
            }
        });
        Self { handle }
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Owns at most one [`Countdown`] and decides which ticks are current.
///
/// Without a sender nothing is spawned and ticks are driven by hand, which
/// is what one-shot commands and unit tests do.
#[derive(Debug)]
pub struct TickSource {
    sender: Option<UnboundedSender<Tick>>,
    period: Duration,
    active: Option<Countdown>,
    armed: bool,
    generation: u64,
}

impl TickSource {
    /// A source that never spawns anything.
    pub fn manual() -> Self {
        Self {
            sender: None,
            period: Duration::from_secs(1),
            active: None,
            armed: false,
            generation: 0,
        }
    }

    /// A source that spawns one-second countdowns feeding `sender`.
    pub fn new(sender: UnboundedSender<Tick>) -> Self {
        Self::with_period(sender, Duration::from_secs(1))
    }

    pub fn with_period(sender: UnboundedSender<Tick>, period: Duration) -> Self {
        Self {
            sender: Some(sender),
            period,
            ..Self::manual()
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Start a countdown unless one is already running.
    pub fn ensure_running(&mut self) {
        if !self.armed {
            self.restart();
        }
    }

    /// Replace any running countdown with a fresh one.
    pub fn restart(&mut self) {
        self.active = None;
        self.generation += 1;
        self.armed = true;
        if let Some(sender) = &self.sender {
            self.active = Some(Countdown::spawn(self.generation, self.period, sender.clone()));
        }
        tracing::trace!(generation = self.generation, "countdown started");
    }

    /// Cancel the running countdown, if any.
    pub fn stop(&mut self) {
        if !self.armed {
            return;
        }
        self.active = None;
        self.armed = false;
        self.generation += 1;
        tracing::trace!(generation = self.generation, "countdown stopped");
    }

    /// Whether `tick` comes from the countdown that is running now.
    pub fn is_current(&self, tick: Tick) -> bool {
        self.armed && tick.generation == self.generation
    }
}
