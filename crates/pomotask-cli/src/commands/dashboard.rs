use pomotask_core::Dashboard;

use super::open_app;

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let app = open_app()?;
    let dashboard = app.dashboard();

    if json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
        return Ok(());
    }

    print!("{}", render(&dashboard));
    if let Some(task) = app.tasks().active_tasks().first() {
        println!("Up next:   {}", task.title);
    }
    Ok(())
}

fn render(d: &Dashboard) -> String {
    format!(
        "Today:     {}/{} tasks done ({}%)\n\
         Active:    {}\n\
         Pomodoros: {} today, {} day streak, {} in total\n",
        d.tasks_completed_today,
        d.tasks_created_today,
        d.completion_pct,
        d.active_tasks,
        d.pomodoros_today,
        d.streak_days,
        d.total_pomodoros,
    )
}
