//! Task management commands for CLI.

use chrono::{Local, TimeZone};
use clap::Subcommand;
use pomotask_core::Task;

use super::{open_app, resolve_task_id};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task to the top of the list
    Add {
        /// Task title
        title: String,
    },
    /// List tasks
    List {
        /// Show completed tasks only
        #[arg(long, conflicts_with = "all")]
        completed: bool,
        /// Show active and completed tasks
        #[arg(long)]
        all: bool,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change a task's title
    Edit {
        /// Task ID (or unique prefix)
        id: String,
        /// New title
        title: String,
    },
    /// Delete a task
    Delete {
        /// Task ID (or unique prefix)
        id: String,
    },
    /// Toggle a task between active and completed
    Toggle {
        /// Task ID (or unique prefix)
        id: String,
    },
    /// Move an active task to another position (1-based)
    Move {
        from: usize,
        to: usize,
    },
    /// Set the order of every active task
    Reorder {
        /// Active task IDs (or unique prefixes) in the new order
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },
    /// Remove all completed tasks
    Clear,
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = open_app()?;

    match action {
        TaskAction::Add { title } => {
            let task = app.add_task(&title)?;
            println!("Task added: {}", task.id);
        }
        TaskAction::List { completed, all, json } => {
            let tasks: Vec<Task> = if all {
                app.tasks().tasks().to_vec()
            } else if completed {
                app.tasks().completed_tasks()
            } else {
                app.tasks().active_tasks()
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else if tasks.is_empty() {
                println!("No tasks.");
            } else {
                for (i, task) in tasks.iter().enumerate() {
                    println!("{}", format_task_line(i + 1, task));
                }
            }
        }
        TaskAction::Edit { id, title } => {
            let id = resolve_task_id(&app, &id)?;
            app.edit_task_title(&id, &title)?;
            println!("Task updated: {id}");
        }
        TaskAction::Delete { id } => {
            let id = resolve_task_id(&app, &id)?;
            app.delete_task(&id);
            println!("Task deleted: {id}");
        }
        TaskAction::Toggle { id } => {
            let id = resolve_task_id(&app, &id)?;
            app.toggle_task_completion(&id);
            let state = match app.tasks().get(&id) {
                Some(task) if task.completed => "completed",
                _ => "active",
            };
            println!("Task {id} is now {state}");
        }
        TaskAction::Move { from, to } => {
            let count = app.tasks().active_tasks().len();
            for pos in [from, to] {
                if pos == 0 || pos > count {
                    return Err(format!("position {pos} out of range 1..={count}").into());
                }
            }
            app.move_active_task(from - 1, to - 1);
            println!("Moved task {from} to {to}");
        }
        TaskAction::Reorder { ids } => {
            let active = app.tasks().active_tasks();
            let mut ordered = Vec::with_capacity(ids.len());
            for id in &ids {
                let id = resolve_task_id(&app, id)?;
                let task = active
                    .iter()
                    .find(|t| t.id == id)
                    .ok_or_else(|| format!("not an active task: {id}"))?;
                if ordered.iter().any(|t: &Task| t.id == id) {
                    return Err(format!("task listed twice: {id}").into());
                }
                ordered.push(task.clone());
            }
            if ordered.len() != active.len() {
                return Err(format!(
                    "expected all {} active tasks, got {}",
                    active.len(),
                    ordered.len()
                )
                .into());
            }
            app.reorder_tasks(ordered);
            println!("Reordered {} tasks", active.len());
        }
        TaskAction::Clear => {
            let removed = app.clear_completed_tasks();
            println!("Removed {removed} completed tasks");
        }
    }

    Ok(())
}

fn format_task_line(position: usize, task: &Task) -> String {
    let mark = if task.completed { "x" } else { " " };
    let short_id: String = task.id.chars().take(8).collect();
    let mut line = format!("{position:>3}. [{mark}] {short_id}  {}", task.title);
    if task.pomodoros_completed > 0 {
        line.push_str(&format!("  ({} 🍅)", task.pomodoros_completed));
    }
    if let Some(done) = task.completed_at.and_then(|ms| Local.timestamp_millis_opt(ms).single()) {
        line.push_str(&format!("  done {}", done.format("%Y-%m-%d %H:%M")));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(completed: bool, pomodoros: u32) -> Task {
        Task {
            id: "0123456789abcdef".into(),
            title: "Write report".into(),
            completed,
            created_at: 0,
            completed_at: None,
            pomodoros_completed: pomodoros,
        }
    }

    #[test]
    fn test_format_active_task() {
        assert_eq!(format_task_line(1, &task(false, 0)), "  1. [ ] 01234567  Write report");
    }

    #[test]
    fn test_format_counts_pomodoros() {
        let line = format_task_line(12, &task(true, 3));
        assert!(line.starts_with(" 12. [x] 01234567  Write report"));
        assert!(line.contains("(3 🍅)"));
    }
}
