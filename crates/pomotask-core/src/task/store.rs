use chrono::NaiveDate;
use std::rc::Rc;

use super::{Task, TaskPatch};
use crate::date::{local_date, now_ms, today};
use crate::error::ValidationError;
use crate::storage::{read, write, DurableStore, TASKS_KEY};

/// Owns the canonical task collection.
///
/// Every mutation rewrites the whole collection in the durable store.
/// Operations on an unknown id are silent no-ops: the id may refer to a
/// task that was deleted after the caller last looked.
pub struct TaskStore {
    store: Rc<dyn DurableStore>,
    tasks: Vec<Task>,
}

impl TaskStore {
    /// Load the task collection from `store`.
    pub fn load(store: Rc<dyn DurableStore>) -> Self {
        let tasks = read(store.as_ref(), TASKS_KEY, Vec::new());
        Self { store, tasks }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// All tasks, active ones first.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Active tasks in user order.
    pub fn active_tasks(&self) -> Vec<Task> {
        self.tasks.iter().filter(|t| !t.completed).cloned().collect()
    }

    /// Completed tasks in insertion order.
    pub fn completed_tasks(&self) -> Vec<Task> {
        self.tasks.iter().filter(|t| t.completed).cloned().collect()
    }

    /// Number of tasks created today.
    pub fn today_tasks_count(&self) -> usize {
        self.today_tasks_count_on(today())
    }

    pub fn today_tasks_count_on(&self, date: NaiveDate) -> usize {
        self.tasks
            .iter()
            .filter(|t| local_date(t.created_at) == Some(date))
            .count()
    }

    /// Number of tasks completed today.
    pub fn completed_tasks_count(&self) -> usize {
        self.completed_tasks_count_on(today())
    }

    pub fn completed_tasks_count_on(&self, date: NaiveDate) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.completed)
            .filter_map(|t| t.completed_at)
            .filter(|&at| local_date(at) == Some(date))
            .count()
    }

    /// Completed-today over created-today, as a rounded percentage.
    pub fn completion_percentage(&self) -> u32 {
        self.completion_percentage_on(today())
    }

    pub fn completion_percentage_on(&self, date: NaiveDate) -> u32 {
        let created = self.today_tasks_count_on(date);
        if created == 0 {
            return 0;
        }
        let completed = self.completed_tasks_count_on(date);
        (completed as f64 / created as f64 * 100.0).round() as u32
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Create a task and put it at the top of the active list.
    ///
    /// # Errors
    /// Returns [`ValidationError::EmptyTitle`] if `title` is blank.
    pub fn add_task(&mut self, title: &str) -> Result<Task, ValidationError> {
        let title = validate_title(title)?;
        let task = Task::new(title, now_ms());
        self.tasks.insert(0, task.clone());
        tracing::debug!(id = %task.id, "task added");
        self.persist();
        Ok(task)
    }

    /// Shallow-merge `patch` onto the task with `id`.
    ///
    /// # Errors
    /// Returns [`ValidationError::EmptyTitle`] if the patch carries a blank
    /// title. Nothing changes in that case.
    pub fn update_task(&mut self, id: &str, mut patch: TaskPatch) -> Result<(), ValidationError> {
        let Some(task) = self.find_mut(id) else {
            tracing::debug!(id, "update for unknown task ignored");
            return Ok(());
        };
        if let Some(title) = patch.title.take() {
            patch.title = Some(validate_title(&title)?);
        }
        task.apply(patch);
        self.persist();
        Ok(())
    }

    pub fn delete_task(&mut self, id: &str) {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() != before {
            self.persist();
        }
    }

    /// Flip completion. Completing stamps `completed_at`; un-completing
    /// clears it.
    pub fn toggle_task_completion(&mut self, id: &str) {
        self.toggle_task_completion_at(id, now_ms());
    }

    fn toggle_task_completion_at(&mut self, id: &str, now: i64) {
        let Some(task) = self.find_mut(id) else {
            return;
        };
        task.completed = !task.completed;
        task.completed_at = task.completed.then_some(now);
        self.persist();
    }

    /// Replace the active ordering.
    ///
    /// The collection becomes `new_active_order` followed by the currently
    /// completed tasks in their existing order. The caller must pass a
    /// permutation of the active tasks.
    pub fn reorder_tasks(&mut self, new_active_order: Vec<Task>) {
        let mut all = new_active_order;
        all.extend(self.tasks.iter().filter(|t| t.completed).cloned());
        self.tasks = all;
        self.persist();
    }

    /// Move the active task at position `from` to position `to`.
    ///
    /// Positions index the active list. Out-of-range positions leave the
    /// order unchanged.
    pub fn move_active_task(&mut self, from: usize, to: usize) {
        let mut active = self.active_tasks();
        if from >= active.len() || to >= active.len() {
            return;
        }
        let dragged = active.remove(from);
        active.insert(to, dragged);
        self.reorder_tasks(active);
    }

    pub fn increment_pomodoro_count(&mut self, id: &str) {
        let Some(task) = self.find_mut(id) else {
            return;
        };
        task.pomodoros_completed = task.pomodoros_completed.saturating_add(1);
        self.persist();
    }

    /// Remove every completed task. Returns how many were removed.
    pub fn clear_completed_tasks(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        let removed = before - self.tasks.len();
        self.persist();
        removed
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    fn persist(&self) {
        write(self.store.as_ref(), TASKS_KEY, &self.tasks);
    }
}

fn validate_title(title: &str) -> Result<String, ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}
