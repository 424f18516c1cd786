//! # Pomotask Core Library
//!
//! Business logic for Pomotask, a task list paired with a Pomodoro
//! work/break timer. The `pomotask` CLI is a thin presentation layer over
//! this crate.
//!
//! ## Architecture
//!
//! - **Timer**: a second-by-second work/break state machine plus a
//!   cancelable tokio countdown that feeds it ticks
//! - **Tasks**: the ordered task collection and its mutations
//! - **Stats**: per-day completed work sessions, today's count and streak
//! - **Storage**: named JSON slots in SQLite (or memory) and the settings
//! - **Notify**: best-effort notifications and the completion chime
//!
//! ## Key Components
//!
//! - [`App`]: wires the components together and routes timer events
//! - [`TimerEngine`]: core timer state machine
//! - [`TaskStore`]: task persistence and ordering
//! - [`StatsTracker`]: streak and daily counts
//! - [`DurableStore`]: storage backend trait

pub mod app;
pub mod date;
pub mod error;
pub mod events;
pub mod notify;
pub mod stats;
pub mod storage;
pub mod task;
pub mod timer;

pub use app::{App, Dashboard};
pub use error::{ConfigError, CoreError, NotifyError, StorageError, ValidationError};
pub use events::Event;
pub use notify::{Chime, ConsoleNotifier, Notification, Notifier, Permission, SilentChime, TerminalBell};
pub use stats::{PomodoroStats, StatsTracker};
pub use storage::{Database, DurableStore, MemoryStore, Settings, SettingsStore, Theme, TimerSettings, TimerSettingsPatch};
pub use task::{Task, TaskPatch, TaskStore};
pub use timer::{format_time, SessionMode, SessionState, Tick, TickSource, TimerEngine};
