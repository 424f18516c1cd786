//! Session-boundary notifications and the completion cue.
//!
//! Both are best-effort. [`Notifier::notify`] never fails from the
//! caller's point of view: it asks for permission inline if nobody has
//! decided yet and quietly does nothing when permission is denied.

mod chime;
mod console;

pub use chime::{Chime, SilentChime, TerminalBell};
pub use console::ConsoleNotifier;

use serde::{Deserialize, Serialize};

use crate::error::NotifyError;

/// Icon shown with session notifications.
pub const NOTIFICATION_ICON: &str = "tomato-icon.png";

/// Notification permission state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Not asked yet.
    #[default]
    Default,
    Granted,
    Denied,
    /// The environment has no notification support.
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: Option<String>,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn work_complete() -> Self {
        Self::new("Work session complete!", "Time for a break.").with_icon(NOTIFICATION_ICON)
    }

    pub fn break_complete() -> Self {
        Self::new("Break complete!", "Ready for another pomodoro?").with_icon(NOTIFICATION_ICON)
    }
}

/// Desktop notification backend.
pub trait Notifier {
    /// Current permission state.
    fn permission(&self) -> Permission;

    /// Ask for permission. Returns the resulting state.
    fn request_permission(&self) -> Permission;

    /// Display `notification` unconditionally.
    fn show(&self, notification: &Notification) -> Result<(), NotifyError>;

    /// Show `notification` if permitted, asking first when undecided.
    fn notify(&self, notification: &Notification) {
        let permission = match self.permission() {
            Permission::Default => self.request_permission(),
            other => other,
        };
        if permission != Permission::Granted {
            tracing::debug!(?permission, title = %notification.title, "notification dropped");
            return;
        }
        if let Err(e) = self.show(notification) {
            tracing::warn!(error = %e, title = %notification.title, "notification failed");
        }
    }
}
