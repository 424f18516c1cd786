//! Integration tests for a full work/break cycle.
//!
//! Covers persistence across restarts on an on-disk database and the
//! tokio countdown driving the timer end to end.

use std::rc::Rc;
use std::time::Duration;

use pomotask_core::{
    App, Database, DurableStore, Event, Permission, ConsoleNotifier, SessionMode, SilentChime,
    Theme, TickSource, TimerSettingsPatch,
};
use tokio::sync::mpsc;

fn quiet_app(store: Rc<dyn DurableStore>) -> App {
    App::new(
        store,
        Box::new(ConsoleNotifier::new(Permission::Denied)),
        Box::new(SilentChime),
    )
}

#[test]
fn test_state_survives_restart_but_timer_does_not() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("pomotask.db");

    let (task_id, settings_before, tasks_before) = {
        let store: Rc<dyn DurableStore> = Rc::new(Database::open_at(&path).unwrap());
        let mut app = quiet_app(store);
        app.update_theme(Theme::Mint);
        app.update_timer_settings(TimerSettingsPatch {
            work_duration: Some(1),
            break_duration: Some(1),
            auto_start_break: Some(false),
        })
        .unwrap();
        app.reset_timer();

        let done = app.add_task("ship it").unwrap();
        let task = app.add_task("deep work").unwrap();
        app.toggle_task_completion(&done.id);

        app.start_timer(Some(&task.id));
        for _ in 0..59 {
            assert!(app.tick().is_none());
        }
        assert!(matches!(app.tick(), Some(Event::WorkCompleted { .. })));
        assert_eq!(app.timer().mode(), SessionMode::Break);
        assert!(!app.timer().is_running());

        (
            task.id,
            app.settings().settings().clone(),
            app.tasks().tasks().to_vec(),
        )
    };

    let store: Rc<dyn DurableStore> = Rc::new(Database::open_at(&path).unwrap());
    let app = quiet_app(store);

    assert_eq!(app.settings().settings(), &settings_before);
    assert_eq!(app.tasks().tasks(), tasks_before.as_slice());
    assert_eq!(app.tasks().get(&task_id).unwrap().pomodoros_completed, 1);
    assert_eq!(app.stats().today, 1);
    assert_eq!(app.stats().streak, 1);

    // Session state is ephemeral: a restart begins a fresh work session.
    assert_eq!(app.timer().mode(), SessionMode::Work);
    assert!(!app.timer().is_running());
    assert_eq!(app.timer().remaining_secs(), 60);
    assert_eq!(app.timer().active_task_id(), None);
}

#[test]
fn test_corrupted_slots_fall_back_to_defaults() {
    let store: Rc<dyn DurableStore> = Rc::new(Database::open_memory().unwrap());
    store.set_raw("pomodoro-settings", "{oops").unwrap();
    store.set_raw("pomodoro-tasks", "not json").unwrap();
    store.set_raw("pomodoro-stats", "[]").unwrap();

    let app = quiet_app(store);
    assert_eq!(app.settings().theme(), Theme::Tomato);
    assert_eq!(app.settings().timer().work_duration, 25);
    assert!(app.tasks().tasks().is_empty());
    assert_eq!(app.stats().today, 0);
}

#[tokio::test(start_paused = true)]
async fn test_countdown_drives_work_session_to_break() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let store: Rc<dyn DurableStore> = Rc::new(Database::open_memory().unwrap());
    let mut app = quiet_app(store);
    app.update_timer_settings(TimerSettingsPatch {
        work_duration: Some(1),
        ..Default::default()
    })
    .unwrap();
    app.reset_timer();
    let mut app = app.with_tick_source(TickSource::with_period(tx, Duration::from_millis(10)));

    let task = app.add_task("tick tock").unwrap();
    app.start_timer(Some(&task.id));

    let mut completion = None;
    while completion.is_none() {
        let tick = rx.recv().await.expect("countdown stopped early");
        completion = app.handle_tick(tick);
    }

    assert!(matches!(completion, Some(Event::WorkCompleted { .. })));
    assert_eq!(app.tasks().get(&task.id).unwrap().pomodoros_completed, 1);
    assert_eq!(app.timer().mode(), SessionMode::Break);
    assert!(app.timer().is_running());

    // Pausing mid-break freezes the countdown even with ticks in flight.
    let tick = rx.recv().await.unwrap();
    app.handle_tick(tick);
    app.pause_timer();
    let frozen = app.timer().remaining_secs();
    tokio::time::sleep(Duration::from_millis(100)).await;
    while let Ok(tick) = rx.try_recv() {
        app.handle_tick(tick);
    }
    assert_eq!(app.timer().remaining_secs(), frozen);
}
