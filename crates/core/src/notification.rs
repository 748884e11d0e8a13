//! Per-request collection of business-rule violations.
//!
//! A [`Notifier`] is created when a request starts, handed by `&mut` to every
//! service the request touches, and consumed when the response is built. It is
//! not `Clone` and never lives in shared state.

use serde::{Deserialize, Serialize};

/// One business-rule violation, identified only by its text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Notification(String);

impl Notification {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Notification {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Notification> for String {
    fn from(value: Notification) -> Self {
        value.0
    }
}

/// Ordered accumulator of [`Notification`]s for a single request.
///
/// Empty means "successful so far".
#[derive(Debug, Default)]
pub struct Notifier {
    notifications: Vec<Notification>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation. Duplicates are kept.
    pub fn notify(&mut self, message: impl Into<String>) {
        self.notifications.push(Notification::new(message));
    }

    pub fn has_notifications(&self) -> bool {
        !self.notifications.is_empty()
    }

    /// Recorded notifications, in call order.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn into_notifications(self) -> Vec<Notification> {
        self.notifications
    }
}
