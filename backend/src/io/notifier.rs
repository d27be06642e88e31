//! User notification collaborator.
//!
//! The engine reports outcomes (budget saved, submit rejected, ...) through
//! [`Notifier`] and never waits on or inspects the result.

use shared::Severity;
use std::sync::Mutex;
use tracing::{error, info, warn};

pub trait Notifier: Send + Sync {
    fn notify_user(&self, message: &str, severity: Severity);
}

/// Writes notifications to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify_user(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Info | Severity::Success => info!(%severity, "{}", message),
            Severity::Warning => warn!(%severity, "{}", message),
            Severity::Error => error!(%severity, "{}", message),
        }
    }
}

/// Notification waiting to be shown by the UI
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

/// Collects notifications so a UI can drain them as toasts
#[derive(Debug, Default)]
pub struct QueuedNotifier {
    pending: Mutex<Vec<Notification>>,
}

impl QueuedNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every pending notification, oldest first
    pub fn drain(&self) -> Vec<Notification> {
        match self.pending.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(_) => Vec::new(),
        }
    }
}

impl Notifier for QueuedNotifier {
    fn notify_user(&self, message: &str, severity: Severity) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.push(Notification {
                message: message.to_string(),
                severity,
            });
        }
    }
}
