//! Statistics commands for CLI.

use clap::Subcommand;

use super::open_app;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Show today's pomodoros and the current streak
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Forget every recorded session
    Reset,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = open_app()?;

    match action {
        StatsAction::Show { json } => {
            let stats = app.stats_tracker().compute_stats();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Today:  {} pomodoros", stats.today);
                println!("Streak: {} days", stats.streak);
            }
        }
        StatsAction::Reset => {
            app.reset_stats();
            println!("Statistics reset.");
        }
    }

    Ok(())
}
