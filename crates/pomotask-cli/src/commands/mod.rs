pub mod config;
pub mod dashboard;
pub mod stats;
pub mod task;
pub mod timer;

use std::rc::Rc;

use pomotask_core::{App, ConsoleNotifier, Database, DurableStore, Permission, TerminalBell};

/// Open the on-disk store and build the application around it.
pub fn open_app() -> Result<App, Box<dyn std::error::Error>> {
    let store: Rc<dyn DurableStore> = Rc::new(Database::open()?);
    Ok(App::new(
        store,
        Box::new(ConsoleNotifier::new(Permission::Default)),
        Box::new(TerminalBell),
    ))
}

/// Resolve a task id or a unique prefix of one.
pub fn resolve_task_id(app: &App, id_or_prefix: &str) -> Result<String, Box<dyn std::error::Error>> {
    if app.tasks().contains(id_or_prefix) {
        return Ok(id_or_prefix.to_string());
    }
    let matches: Vec<_> = app
        .tasks()
        .tasks()
        .iter()
        .filter(|t| t.id.starts_with(id_or_prefix))
        .collect();
    match matches.as_slice() {
        [task] => Ok(task.id.clone()),
        [] => Err(format!("task not found: {id_or_prefix}").into()),
        _ => Err(format!("ambiguous task id prefix: {id_or_prefix}").into()),
    }
}
