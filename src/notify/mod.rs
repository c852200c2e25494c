//! Transient user notifications
//!
//! A notification is shown for a fixed duration and never persisted.

use chrono::{DateTime, Utc};
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub shown_at: DateTime<Utc>,
    pub duration: Duration,
}

impl Notification {
    pub fn success(message: impl Into<String>, duration: Duration) -> Self {
        Self::new(NotificationKind::Success, message, duration)
    }

    pub fn error(message: impl Into<String>, duration: Duration) -> Self {
        Self::new(NotificationKind::Error, message, duration)
    }

    fn new(kind: NotificationKind, message: impl Into<String>, duration: Duration) -> Self {
        Self {
            kind,
            message: message.into(),
            shown_at: Utc::now(),
            duration,
        }
    }

    /// Whether the notification is still visible at `now`
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        match chrono::Duration::from_std(self.duration) {
            Ok(d) => self
                .shown_at
                .checked_add_signed(d)
                .map_or(true, |end| now < end),
            Err(_) => true,
        }
    }
}

/// Sink for user-facing notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Prints notifications to the terminal
///
/// A message identical to the one still on screen is not printed again.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    banner: Banner,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        if let Some(shown) = self.banner.current() {
            if shown.kind == notification.kind && shown.message == notification.message {
                debug!(message = %notification.message, "notification already visible");
                return;
            }
        }

        debug!(kind = ?notification.kind, message = %notification.message, "notification");
        match notification.kind {
            NotificationKind::Success => println!("✓ {}", notification.message),
            NotificationKind::Error => println!("✗ {}", notification.message),
        }
        self.banner.notify(notification);
    }
}

/// Single-slot banner: a new notification replaces the previous one
#[derive(Debug, Default)]
pub struct Banner {
    slot: Mutex<Option<Notification>>,
}

impl Banner {
    pub fn new() -> Self {
        Self::default()
    }

    /// The visible notification, if it has not expired
    pub fn current(&self) -> Option<Notification> {
        self.current_at(Utc::now())
    }

    pub fn current_at(&self, now: DateTime<Utc>) -> Option<Notification> {
        let slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        slot.as_ref().filter(|n| n.is_active_at(now)).cloned()
    }

    /// Last notification shown, expired or not
    pub fn last(&self) -> Option<Notification> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Notifier for Banner {
    fn notify(&self, notification: Notification) {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(notification);
    }
}
