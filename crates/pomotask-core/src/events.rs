use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::SessionMode;

/// Every timer state change produces an Event.
///
/// Completion events are the only ones with side effects outside the
/// timer; the [`App`](crate::App) consumes them and fans them out to the
/// statistics tracker, task store and notifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        mode: SessionMode,
        task_id: Option<String>,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: SessionMode,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: SessionMode,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    TimerAdjusted {
        mode: SessionMode,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    /// A work session ran out. `task_id` is the task it was attributed to.
    WorkCompleted {
        task_id: Option<String>,
        at: DateTime<Utc>,
    },
    BreakCompleted {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: SessionMode,
        is_running: bool,
        remaining_secs: u32,
        original_secs: u32,
        display: String,
        progress_pct: u32,
        active_task_id: Option<String>,
        at: DateTime<Utc>,
    },
}
