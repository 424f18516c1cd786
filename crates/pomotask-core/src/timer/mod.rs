mod countdown;
mod engine;
mod format;

pub use countdown::{Countdown, Tick, TickSource};
pub use engine::{SessionMode, SessionState, TimerEngine, MIN_ADJUSTED_SECS};
pub use format::{format_time, time_percentage};
