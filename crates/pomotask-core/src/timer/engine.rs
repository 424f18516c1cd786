//! Work/break session state machine.
//!
//! The engine has no clock of its own. Something outside it (the
//! [`Countdown`](super::Countdown) in the CLI, the test itself in unit
//! tests) calls `tick()` once per elapsed second while the timer runs.
//!
//! ## State Transitions
//!
//! ```text
//! (work, paused) <-> (work, running) --last tick--> (break, running | paused)
//! (break, paused) <-> (break, running) --last tick--> (work, paused)
//! ```
//!
//! The break after a work session starts running only when
//! `auto_start_break` is set. A finished break always waits for the user.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::format::{format_time, time_percentage};
use crate::events::Event;
use crate::storage::TimerSettings;

/// Shortest countdown a manual adjustment can leave.
pub const MIN_ADJUSTED_SECS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    Work,
    Break,
}

/// The live session. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub mode: SessionMode,
    pub is_running: bool,
    /// Seconds left, never above `original_duration`.
    pub time_remaining: u32,
    /// Seconds the current countdown started from.
    pub original_duration: u32,
    /// Task the session is attributed to. May name a deleted task.
    pub active_task_id: Option<String>,
}

/// Core timer engine.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    settings: TimerSettings,
    state: SessionState,
}

impl TimerEngine {
    /// Create an engine paused at the start of a work session.
    pub fn new(settings: TimerSettings) -> Self {
        let work = settings.work_secs();
        Self {
            settings,
            state: SessionState {
                mode: SessionMode::Work,
                is_running: false,
                time_remaining: work,
                original_duration: work,
                active_task_id: None,
            },
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn mode(&self) -> SessionMode {
        self.state.mode
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    pub fn remaining_secs(&self) -> u32 {
        self.state.time_remaining
    }

    pub fn original_secs(&self) -> u32 {
        self.state.original_duration
    }

    pub fn active_task_id(&self) -> Option<&str> {
        self.state.active_task_id.as_deref()
    }

    pub fn settings(&self) -> TimerSettings {
        self.settings
    }

    /// Full countdown length for `mode` under the current settings.
    pub fn duration_for(&self, mode: SessionMode) -> u32 {
        match mode {
            SessionMode::Work => self.settings.work_secs(),
            SessionMode::Break => self.settings.break_secs(),
        }
    }

    /// Remaining time as `MM:SS`.
    pub fn display(&self) -> String {
        format_time(self.state.time_remaining)
    }

    /// Elapsed share of the current countdown, 0..=100.
    pub fn progress_pct(&self) -> u32 {
        time_percentage(self.state.time_remaining, self.state.original_duration)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            mode: self.state.mode,
            is_running: self.state.is_running,
            remaining_secs: self.state.time_remaining,
            original_secs: self.state.original_duration,
            display: self.display(),
            progress_pct: self.progress_pct(),
            active_task_id: self.state.active_task_id.clone(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start (or keep) the countdown, optionally attributing it to a task.
    ///
    /// Returns `None` when the timer was already running.
    pub fn start(&mut self, task_id: Option<String>) -> Option<Event> {
        if task_id.is_some() {
            self.state.active_task_id = task_id;
        }
        if self.state.is_running {
            return None;
        }
        self.state.is_running = true;
        Some(Event::TimerStarted {
            mode: self.state.mode,
            task_id: self.state.active_task_id.clone(),
            remaining_secs: self.state.time_remaining,
            at: Utc::now(),
        })
    }

    /// Returns `None` when the timer was already paused.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }
        self.state.is_running = false;
        Some(Event::TimerPaused {
            mode: self.state.mode,
            remaining_secs: self.state.time_remaining,
            at: Utc::now(),
        })
    }

    /// Stop and rewind the current mode to its full duration.
    pub fn reset(&mut self) -> Option<Event> {
        let duration = self.duration_for(self.state.mode);
        self.state.is_running = false;
        self.state.time_remaining = duration;
        self.state.original_duration = duration;
        Some(Event::TimerReset {
            mode: self.state.mode,
            duration_secs: duration,
            at: Utc::now(),
        })
    }

    /// Add `delta_minutes` (may be negative) to a paused countdown.
    ///
    /// The result never drops below one minute. Ignored while running.
    pub fn adjust(&mut self, delta_minutes: i32) -> Option<Event> {
        if self.state.is_running {
            return None;
        }
        let adjusted = i64::from(self.state.time_remaining) + i64::from(delta_minutes) * 60;
        let secs = adjusted.clamp(i64::from(MIN_ADJUSTED_SECS), i64::from(u32::MAX)) as u32;
        self.state.time_remaining = secs;
        self.state.original_duration = secs;
        Some(Event::TimerAdjusted {
            mode: self.state.mode,
            duration_secs: secs,
            at: Utc::now(),
        })
    }

    /// Advance one second.
    ///
    /// Returns `Some(Event::WorkCompleted)` or `Some(Event::BreakCompleted)`
    /// when the countdown finishes; by then the engine already sits in the
    /// next mode.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }
        if self.state.time_remaining > 1 {
            self.state.time_remaining -= 1;
            return None;
        }

        self.state.is_running = false;
        match self.state.mode {
            SessionMode::Work => {
                self.enter(SessionMode::Break);
                self.state.is_running = self.settings.auto_start_break;
                Some(Event::WorkCompleted {
                    task_id: self.state.active_task_id.clone(),
                    at: Utc::now(),
                })
            }
            SessionMode::Break => {
                self.enter(SessionMode::Work);
                Some(Event::BreakCompleted { at: Utc::now() })
            }
        }
    }

    /// Swap in new settings.
    ///
    /// The current countdown keeps its length; new durations apply from
    /// the next reset or mode switch.
    pub fn set_settings(&mut self, settings: TimerSettings) {
        self.settings = settings;
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn enter(&mut self, mode: SessionMode) {
        let duration = self.duration_for(mode);
        self.state.mode = mode;
        self.state.time_remaining = duration;
        self.state.original_duration = duration;
    }
}
