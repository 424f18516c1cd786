//! Application wiring.
//!
//! [`App`] is built once at startup from an injected durable store,
//! notifier and chime. It owns the settings, task store, statistics
//! tracker and timer, issues every command to them, and turns timer
//! completion events into their cross-component side effects:
//!
//! - work completed: chime, count the session for today, credit the
//!   attached task (if it still exists), notify.
//! - break completed: chime, notify, close the timer view.

use serde::Serialize;
use std::rc::Rc;
use tokio::sync::mpsc::UnboundedSender;

use crate::error::ValidationError;
use crate::events::Event;
use crate::notify::{Chime, Notification, Notifier};
use crate::stats::{PomodoroStats, StatsTracker};
use crate::storage::{DurableStore, SettingsStore, Theme, TimerSettingsPatch};
use crate::task::{Task, TaskPatch, TaskStore};
use crate::timer::{Tick, TickSource, TimerEngine};
use crate::CoreError;

/// Figures shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub tasks_created_today: usize,
    pub tasks_completed_today: usize,
    pub completion_pct: u32,
    pub active_tasks: usize,
    pub pomodoros_today: u32,
    pub streak_days: u32,
    /// Pomodoros credited to every task still in the list.
    pub total_pomodoros: u32,
}

pub struct App {
    settings: SettingsStore,
    tasks: TaskStore,
    stats: StatsTracker,
    timer: TimerEngine,
    ticks: TickSource,
    notifier: Box<dyn Notifier>,
    chime: Box<dyn Chime>,
    timer_view_open: bool,
}

impl App {
    /// Load every store from `store`. Ticks are driven by hand through
    /// [`App::tick`] until [`App::with_tick_sender`] is used.
    pub fn new(store: Rc<dyn DurableStore>, notifier: Box<dyn Notifier>, chime: Box<dyn Chime>) -> Self {
        let settings = SettingsStore::load(store.clone());
        let timer = TimerEngine::new(settings.timer());
        Self {
            tasks: TaskStore::load(store.clone()),
            stats: StatsTracker::load(store),
            settings,
            timer,
            ticks: TickSource::manual(),
            notifier,
            chime,
            timer_view_open: false,
        }
    }

    /// Spawn a real one-second countdown feeding `sender` whenever the
    /// timer runs. Ticks received from it go to [`App::handle_tick`].
    pub fn with_tick_sender(mut self, sender: UnboundedSender<Tick>) -> Self {
        self.ticks = TickSource::new(sender);
        self.sync_countdown();
        self
    }

    /// Replace the tick source (custom periods in tests).
    pub fn with_tick_source(mut self, ticks: TickSource) -> Self {
        self.ticks = ticks;
        self.sync_countdown();
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    /// Today's count and streak against the current date.
    pub fn stats(&self) -> PomodoroStats {
        self.stats.compute_stats()
    }

    pub fn stats_tracker(&self) -> &StatsTracker {
        &self.stats
    }

    pub fn timer(&self) -> &TimerEngine {
        &self.timer
    }

    /// Task the running session is attributed to, if it still exists.
    pub fn active_task(&self) -> Option<&Task> {
        self.timer.active_task_id().and_then(|id| self.tasks.get(id))
    }

    pub fn is_timer_view_open(&self) -> bool {
        self.timer_view_open
    }

    pub fn tick_generation(&self) -> u64 {
        self.ticks.generation()
    }

    pub fn dashboard(&self) -> Dashboard {
        let stats = self.stats();
        Dashboard {
            tasks_created_today: self.tasks.today_tasks_count(),
            tasks_completed_today: self.tasks.completed_tasks_count(),
            completion_pct: self.tasks.completion_percentage(),
            active_tasks: self.tasks.active_tasks().len(),
            pomodoros_today: stats.today,
            streak_days: stats.streak,
            total_pomodoros: self.tasks.tasks().iter().map(|t| t.pomodoros_completed).sum(),
        }
    }

    // ── Task commands ────────────────────────────────────────────────

    pub fn add_task(&mut self, title: &str) -> Result<Task, ValidationError> {
        self.tasks.add_task(title)
    }

    pub fn update_task(&mut self, id: &str, patch: TaskPatch) -> Result<(), ValidationError> {
        self.tasks.update_task(id, patch)
    }

    pub fn edit_task_title(&mut self, id: &str, title: &str) -> Result<(), ValidationError> {
        self.tasks.update_task(id, TaskPatch::title(title))
    }

    pub fn delete_task(&mut self, id: &str) {
        self.tasks.delete_task(id);
    }

    pub fn toggle_task_completion(&mut self, id: &str) {
        self.tasks.toggle_task_completion(id);
    }

    pub fn reorder_tasks(&mut self, new_active_order: Vec<Task>) {
        self.tasks.reorder_tasks(new_active_order);
    }

    pub fn move_active_task(&mut self, from: usize, to: usize) {
        self.tasks.move_active_task(from, to);
    }

    pub fn clear_completed_tasks(&mut self) -> usize {
        self.tasks.clear_completed_tasks()
    }

    // ── Timer commands ───────────────────────────────────────────────

    pub fn start_timer(&mut self, task_id: Option<&str>) -> Option<Event> {
        let event = self.timer.start(task_id.map(str::to_string));
        self.sync_countdown();
        event
    }

    pub fn pause_timer(&mut self) -> Option<Event> {
        let event = self.timer.pause();
        self.sync_countdown();
        event
    }

    pub fn reset_timer(&mut self) -> Option<Event> {
        let event = self.timer.reset();
        self.sync_countdown();
        event
    }

    pub fn adjust_timer(&mut self, delta_minutes: i32) -> Option<Event> {
        self.timer.adjust(delta_minutes)
    }

    /// Open the timer view, optionally on a task, and start counting.
    pub fn open_timer_view(&mut self, task_id: Option<&str>) -> Option<Event> {
        self.timer_view_open = true;
        self.start_timer(task_id)
    }

    /// Close the timer view; the session is paused, not reset.
    pub fn close_timer_view(&mut self) -> Option<Event> {
        self.timer_view_open = false;
        self.pause_timer()
    }

    /// Apply a tick from the countdown. Stale ticks are ignored.
    pub fn handle_tick(&mut self, tick: Tick) -> Option<Event> {
        if !self.ticks.is_current(tick) {
            tracing::trace!(
                tick = tick.generation,
                current = self.ticks.generation(),
                "stale tick dropped"
            );
            return None;
        }
        self.tick()
    }

    /// Advance the timer one second and run completion side effects.
    pub fn tick(&mut self) -> Option<Event> {
        let event = self.timer.tick()?;
        self.play_chime();
        match &event {
            Event::WorkCompleted { task_id, .. } => self.on_work_completed(task_id.as_deref()),
            Event::BreakCompleted { .. } => self.on_break_completed(),
            _ => {}
        }
        // The finished countdown never continues into the next session.
        self.ticks.stop();
        self.sync_countdown();
        Some(event)
    }

    // ── Settings commands ────────────────────────────────────────────

    pub fn update_theme(&mut self, theme: Theme) {
        self.settings.update_theme(theme);
    }

    pub fn update_timer_settings(&mut self, patch: TimerSettingsPatch) -> Result<(), ValidationError> {
        self.settings.update_timer_settings(patch)?;
        self.timer.set_settings(self.settings.timer());
        Ok(())
    }

    /// Set a setting by dot-separated key (`timer.workDuration`).
    pub fn set_setting(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.settings.set(key, value)?;
        self.timer.set_settings(self.settings.timer());
        Ok(())
    }

    pub fn reset_settings(&mut self) {
        self.settings.reset();
        self.timer.set_settings(self.settings.timer());
    }

    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn on_work_completed(&mut self, task_id: Option<&str>) {
        let today = self.stats.record_work_completion();
        match task_id {
            Some(id) if self.tasks.contains(id) => self.tasks.increment_pomodoro_count(id),
            Some(id) => tracing::debug!(id, "completed session's task no longer exists"),
            None => {}
        }
        tracing::info!(today, task_id, "work session complete");
        self.notifier.notify(&Notification::work_complete());
    }

    fn on_break_completed(&mut self) {
        tracing::info!("break complete");
        self.notifier.notify(&Notification::break_complete());
        self.timer_view_open = false;
    }

    fn play_chime(&self) {
        if let Err(e) = self.chime.play() {
            tracing::warn!(error = %e, "completion sound failed");
        }
    }

    fn sync_countdown(&mut self) {
        if self.timer.is_running() {
            self.ticks.ensure_running();
        } else {
            self.ticks.stop();
        }
    }
}
