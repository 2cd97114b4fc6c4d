//! User-facing error notifications.
//!
//! The API client reports every terminal request failure through a
//! `Notifier` so the embedding application can surface it (toast,
//! status line, dialog). Rendering is the application's problem; the
//! default implementation just logs.

use tracing::error;

pub trait Notifier: Send + Sync {
    /// Report a terminal request failure to the user.
    fn error(&self, summary: &str, detail: &str);
}

/// Default notifier: emits through `tracing`.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn error(&self, summary: &str, detail: &str) {
        error!(summary = summary, detail = detail, "API request failed");
    }
}
