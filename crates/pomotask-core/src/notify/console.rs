use std::cell::{Cell, RefCell};
use std::io::Write;

use super::{Notification, Notifier, Permission};
use crate::error::NotifyError;

/// Prints notifications as a line on a terminal stream (stderr by default).
///
/// A terminal can always show text, so an undecided permission is granted
/// on request. Construct with [`Permission::Denied`] to mute it.
pub struct ConsoleNotifier {
    permission: Cell<Permission>,
    out: RefCell<Box<dyn Write>>,
}

impl ConsoleNotifier {
    pub fn new(permission: Permission) -> Self {
        Self::with_writer(permission, Box::new(std::io::stderr()))
    }

    pub fn with_writer(permission: Permission, out: Box<dyn Write>) -> Self {
        Self {
            permission: Cell::new(permission),
            out: RefCell::new(out),
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn permission(&self) -> Permission {
        self.permission.get()
    }

    fn request_permission(&self) -> Permission {
        if self.permission.get() == Permission::Default {
            self.permission.set(Permission::Granted);
        }
        self.permission.get()
    }

    fn show(&self, notification: &Notification) -> Result<(), NotifyError> {
        let mut out = self.out.borrow_mut();
        writeln!(out, "🍅 {} {}", notification.title, notification.body)?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Sink(Rc<RefCell<Vec<u8>>>);

    impl Write for Sink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn undecided_permission_is_granted_on_request() {
        let sink = Sink::default();
        let notifier = ConsoleNotifier::with_writer(Permission::Default, Box::new(sink.clone()));
        notifier.notify(&Notification::work_complete());
        assert_eq!(notifier.permission(), Permission::Granted);
        let text = String::from_utf8(sink.0.borrow().clone()).unwrap();
        assert!(text.contains("Work session complete! Time for a break."));
    }

    #[test]
    fn denied_stays_silent() {
        let sink = Sink::default();
        let notifier = ConsoleNotifier::with_writer(Permission::Denied, Box::new(sink.clone()));
        assert_eq!(notifier.request_permission(), Permission::Denied);
        notifier.notify(&Notification::break_complete());
        assert!(sink.0.borrow().is_empty());
    }
}
