use crate::error::NotifyError;

/// Capability interface for raising a local alert. Selected once at startup;
/// a delivery failure is logged by the caller, never fatal.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError>;
}

/// Desktop alerts via notify-rust, which dispatches to the platform facility
/// (D-Bus/XDG on Linux and the BSDs, Notification Center on macOS, toasts on
/// Windows).
#[derive(Debug, Default)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        let mut notification = notify_rust::Notification::new();
        notification.summary(title).body(body);
        #[cfg(all(unix, not(target_os = "macos")))]
        notification.urgency(notify_rust::Urgency::Normal);
        notification.show()?;
        Ok(())
    }
}

/// Fallback for hosts without a desktop notification facility: the alert is
/// printed to stderr instead.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        use std::io::Write;
        let mut err = std::io::stderr().lock();
        writeln!(err, "Notification: {title} - {body}")?;
        Ok(())
    }
}

/// Pick the notification mechanism for the host platform.
pub fn detect() -> Box<dyn Notifier> {
    #[cfg(any(
        target_os = "linux",
        target_os = "freebsd",
        target_os = "netbsd",
        target_os = "openbsd",
        target_os = "macos",
        target_os = "windows"
    ))]
    {
        Box::new(DesktopNotifier)
    }
    #[cfg(not(any(
        target_os = "linux",
        target_os = "freebsd",
        target_os = "netbsd",
        target_os = "openbsd",
        target_os = "macos",
        target_os = "windows"
    )))]
    {
        Box::new(ConsoleNotifier)
    }
}
