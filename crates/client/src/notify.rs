//! User-visible notification surface.
//!
//! The core calls this fire-and-forget; front ends decide how to render it
//! (the CLI prints colored lines, the web client showed toasts).

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

/// Sink for user-visible messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, severity: Severity);
}

/// Discards all notifications. Useful when embedding the client headless.
#[derive(Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _message: &str, _severity: Severity) {}
}
