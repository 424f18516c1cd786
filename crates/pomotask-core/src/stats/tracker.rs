use chrono::NaiveDate;
use std::rc::Rc;

use super::{compute_stats, DailyCounts, PomodoroStats, MAX_STREAK_LOOKBACK_DAYS};
use crate::date::{date_key, today};
use crate::storage::{read, write, DurableStore, STATS_KEY};

/// Records completed work sessions and keeps derived stats current.
pub struct StatsTracker {
    store: Rc<dyn DurableStore>,
    counts: DailyCounts,
    stats: PomodoroStats,
    max_lookback: u32,
}

impl StatsTracker {
    /// Load the per-day history from `store`.
    pub fn load(store: Rc<dyn DurableStore>) -> Self {
        let counts = read(store.as_ref(), STATS_KEY, DailyCounts::new());
        let mut tracker = Self {
            store,
            counts,
            stats: PomodoroStats::default(),
            max_lookback: MAX_STREAK_LOOKBACK_DAYS,
        };
        tracker.refresh();
        tracker
    }

    /// Override the streak lookback cap.
    pub fn with_max_lookback(mut self, days: u32) -> Self {
        self.max_lookback = days;
        self.refresh();
        self
    }

    pub fn counts(&self) -> &DailyCounts {
        &self.counts
    }

    /// Stats as of the last change.
    pub fn stats(&self) -> PomodoroStats {
        self.stats
    }

    /// Stats computed against the clock right now.
    pub fn compute_stats(&self) -> PomodoroStats {
        self.compute_stats_on(today())
    }

    pub fn compute_stats_on(&self, date: NaiveDate) -> PomodoroStats {
        compute_stats(&self.counts, date, self.max_lookback)
    }

    /// Count one completed work session for today. Returns today's new
    /// count.
    pub fn record_work_completion(&mut self) -> u32 {
        self.record_work_completion_on(today())
    }

    pub fn record_work_completion_on(&mut self, date: NaiveDate) -> u32 {
        let count = self.counts.entry(date_key(date)).or_insert(0);
        *count = count.saturating_add(1);
        let count = *count;
        write(self.store.as_ref(), STATS_KEY, &self.counts);
        self.stats = self.compute_stats_on(date);
        tracing::debug!(date = %date, count, streak = self.stats.streak, "work session recorded");
        count
    }

    /// Wipe the history.
    pub fn reset(&mut self) {
        self.counts.clear();
        write(self.store.as_ref(), STATS_KEY, &self.counts);
        self.refresh();
    }

    /// Recompute cached stats against today's date.
    pub fn refresh(&mut self) {
        self.stats = self.compute_stats();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn recording_updates_counts_and_cached_stats() {
        let backing: Rc<dyn DurableStore> = Rc::new(MemoryStore::new());
        let mut tracker = StatsTracker::load(backing);
        let d = day(2026, 6, 1);

        tracker.record_work_completion_on(d.pred_opt().unwrap());
        assert_eq!(tracker.record_work_completion_on(d), 1);
        assert_eq!(tracker.record_work_completion_on(d), 2);

        assert_eq!(tracker.stats(), PomodoroStats { today: 2, streak: 2 });
        assert_eq!(tracker.counts().get("2026-06-01"), Some(&2));
    }

    #[test]
    fn history_roundtrips_through_store() {
        let backing: Rc<dyn DurableStore> = Rc::new(MemoryStore::new());
        let mut tracker = StatsTracker::load(backing.clone());
        tracker.record_work_completion_on(day(2026, 6, 1));
        tracker.record_work_completion_on(day(2026, 6, 3));

        let reloaded = StatsTracker::load(backing);
        assert_eq!(reloaded.counts(), tracker.counts());
    }

    #[test]
    fn record_for_today_shows_in_stats() {
        let backing: Rc<dyn DurableStore> = Rc::new(MemoryStore::new());
        let mut tracker = StatsTracker::load(backing);
        tracker.record_work_completion();
        assert_eq!(tracker.stats().today, 1);
        assert!(tracker.stats().streak >= 1);
    }

    #[test]
    fn reset_clears_history() {
        let backing: Rc<dyn DurableStore> = Rc::new(MemoryStore::new());
        let mut tracker = StatsTracker::load(backing.clone());
        tracker.record_work_completion();
        tracker.reset();
        assert!(tracker.counts().is_empty());
        assert_eq!(tracker.stats(), PomodoroStats::default());
        assert!(StatsTracker::load(backing).counts().is_empty());
    }

    #[test]
    fn malformed_history_loads_empty() {
        let backing: Rc<dyn DurableStore> = Rc::new(MemoryStore::new());
        backing.set_raw(STATS_KEY, "[1,2,3]").unwrap();
        let tracker = StatsTracker::load(backing);
        assert!(tracker.counts().is_empty());
    }
}
