use std::sync::Mutex;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// A short user-facing message about a save attempt.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Collects notifications raised while serving one request so they can be
/// returned to the client alongside the result.
#[derive(Debug, Default)]
pub struct ToastCollector {
    notifications: Mutex<Vec<Notification>>,
}

impl ToastCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains everything collected so far.
    pub fn take(&self) -> Vec<Notification> {
        match self.notifications.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Notifier for ToastCollector {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => log::info!("{}", notification.message),
            NotificationKind::Error => log::warn!("{}", notification.message),
        }

        match self.notifications.lock() {
            Ok(mut guard) => guard.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }
}
