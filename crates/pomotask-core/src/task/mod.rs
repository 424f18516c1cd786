//! Task records and the store that owns them.
//!
//! Tasks are persisted as one ordered JSON array. Active tasks come in the
//! order the user arranged them; completed tasks keep insertion order.

mod store;

pub use store::TaskStore;

use serde::{Deserialize, Serialize};

/// A to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    /// Creation time, epoch milliseconds.
    pub created_at: i64,
    /// Completion time, epoch milliseconds. Only set while `completed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    #[serde(default)]
    pub pomodoros_completed: u32,
}

impl Task {
    pub(crate) fn new(title: String, created_at: i64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            completed: false,
            created_at,
            completed_at: None,
            pomodoros_completed: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.completed
    }

    /// Shallow-merge `patch` onto this task.
    fn apply(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(completed_at) = patch.completed_at {
            self.completed_at = completed_at;
        }
        if let Some(count) = patch.pomodoros_completed {
            self.pomodoros_completed = count;
        }
    }
}

/// Partial update for a [`Task`]. `None` fields are left untouched.
///
/// `completed_at: Some(None)` clears the completion time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub completed_at: Option<Option<i64>>,
    pub pomodoros_completed: Option<u32>,
}

impl TaskPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}
