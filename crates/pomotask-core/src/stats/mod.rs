//! Completed work sessions per calendar day.
//!
//! The history is a map from `YYYY-MM-DD` (local date) to a count. Today's
//! count and the current streak are derived from it, never stored.

mod tracker;

pub use tracker::StatsTracker;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::date::date_key;

/// How far back a streak walk may go before giving up (about ten years).
pub const MAX_STREAK_LOOKBACK_DAYS: u32 = 3650;

/// Per-day completed work session counts keyed by `YYYY-MM-DD`.
pub type DailyCounts = BTreeMap<String, u32>;

/// Derived statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroStats {
    /// Work sessions completed today.
    pub today: u32,
    /// Consecutive days, ending today, with at least one completed session.
    pub streak: u32,
}

/// Derive [`PomodoroStats`] for `today` from `counts`.
///
/// The streak walk stops at the first day without sessions or after
/// `max_lookback` days, whichever comes first.
pub fn compute_stats(counts: &DailyCounts, today: NaiveDate, max_lookback: u32) -> PomodoroStats {
    let count_on = |date: NaiveDate| counts.get(&date_key(date)).copied().unwrap_or(0);

    let mut streak = 0;
    let mut day = Some(today);
    while let Some(date) = day {
        if streak >= max_lookback || count_on(date) == 0 {
            break;
        }
        streak += 1;
        day = date.pred_opt();
    }

    PomodoroStats {
        today: count_on(today),
        streak,
    }
}
