//! Interactive timer for CLI.
//!
//! `pomotask timer run` opens the timer view and drives it from a
//! one-second countdown until the break after a work session ends, the
//! user quits or stdin closes. Keys (one per line):
//!
//! ```text
//! s start   p pause   r reset   + / - adjust by a minute   q quit
//! ```

use std::io::Write;

use clap::Subcommand;
use pomotask_core::{App, Event, SessionMode};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use super::{open_app, resolve_task_id};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the timer in the foreground
    Run {
        /// Task ID (or unique prefix) to attribute the session to
        #[arg(long)]
        task: Option<String>,
        /// Print events as JSON lines instead of a live display
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Start,
    Pause,
    Reset,
    Adjust(i32),
    Quit,
}

impl Key {
    fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "s" => Some(Key::Start),
            "p" => Some(Key::Pause),
            "r" => Some(Key::Reset),
            "+" => Some(Key::Adjust(1)),
            "-" => Some(Key::Adjust(-1)),
            "q" => Some(Key::Quit),
            _ => None,
        }
    }
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Run { task, json } => {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let result = rt.block_on(session(task, json));
            // The stdin reader blocks on a thread of its own.
            rt.shutdown_background();
            result
        }
    }
}

async fn session(task: Option<String>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let app = open_app()?;
    let task_id = task.map(|t| resolve_task_id(&app, &t)).transpose()?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = app.with_tick_sender(tx);
    let view = View { json };

    if let Some(task) = task_id.as_deref().and_then(|id| app.tasks().get(id)) {
        view.message(&format!("Focusing on: {}", task.title));
    }
    view.event(app.open_timer_view(task_id.as_deref()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        view.render(&app);
        tokio::select! {
            Some(tick) = rx.recv() => {
                view.event(app.handle_tick(tick));
                if !app.is_timer_view_open() {
                    break;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::debug!("stdin closed");
                    view.event(app.close_timer_view());
                    break;
                };
                match Key::parse(&line) {
                    Some(Key::Quit) => {
                        view.event(app.close_timer_view());
                        break;
                    }
                    Some(key) => view.event(apply(&mut app, key)),
                    None if line.trim().is_empty() => {}
                    None => view.message("keys: s start, p pause, r reset, +/- adjust, q quit"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                view.event(app.close_timer_view());
                break;
            }
        }
    }

    view.finish();
    Ok(())
}

fn apply(app: &mut App, key: Key) -> Option<Event> {
    match key {
        Key::Start => app.start_timer(None),
        Key::Pause => app.pause_timer(),
        Key::Reset => app.reset_timer(),
        Key::Adjust(delta) => app.adjust_timer(delta),
        Key::Quit => app.close_timer_view(),
    }
}

fn mode_label(mode: SessionMode) -> &'static str {
    match mode {
        SessionMode::Work => "Work",
        SessionMode::Break => "Break",
    }
}

struct View {
    json: bool,
}

impl View {
    fn render(&self, app: &App) {
        if self.json {
            return;
        }
        let timer = app.timer();
        let state = if timer.is_running() { "" } else { " (paused)" };
        print!(
            "\r{:<5} {} {:>3}%{:<10}",
            mode_label(timer.mode()),
            timer.display(),
            timer.progress_pct(),
            state
        );
        if let Err(e) = std::io::stdout().flush() {
            tracing::debug!(error = %e, "failed to flush timer display");
        }
    }

    fn event(&self, event: Option<Event>) {
        if let Some(line) = event.and_then(|e| self.event_line(&e)) {
            println!("{line}");
        }
    }

    /// Line printed for `event`. Completion announcements come from the
    /// notifier, so the live display prints none.
    fn event_line(&self, event: &Event) -> Option<String> {
        if !self.json {
            return None;
        }
        match serde_json::to_string(event) {
            Ok(line) => Some(line),
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode event");
                None
            }
        }
    }

    fn message(&self, text: &str) {
        if self.json {
            return;
        }
        println!("\r{text:<40}");
    }

    fn finish(&self) {
        if !self.json {
            println!();
        }
    }
}
