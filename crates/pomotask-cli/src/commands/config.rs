use clap::Subcommand;
use pomotask_core::Theme;

use super::open_app;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a setting
    Get {
        /// Setting key (e.g. "theme", "timer.workDuration")
        key: String,
    },
    /// Set a setting
    Set {
        /// Setting key
        key: String,
        /// New value
        value: String,
    },
    /// List all settings
    List,
    /// Reset settings to defaults
    Reset,
    /// Switch the theme
    Theme {
        /// One of: tomato, mint, midnight
        name: String,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = open_app()?;

    match action {
        ConfigAction::Get { key } => match app.settings().get(&key) {
            Some(value) => println!("{value}"),
            None => return Err(format!("unknown key: {key}").into()),
        },
        ConfigAction::Set { key, value } => {
            app.set_setting(&key, &value)?;
            println!("ok");
        }
        ConfigAction::List => {
            let json = serde_json::to_string_pretty(app.settings().settings())?;
            println!("{json}");
        }
        ConfigAction::Reset => {
            app.reset_settings();
            println!("settings reset to defaults");
        }
        ConfigAction::Theme { name } => {
            let theme: Theme = name.parse()?;
            app.update_theme(theme);
            println!("theme: {theme}");
        }
    }
    Ok(())
}
