//! Notification types for user-visible failures.
//!
//! A [`Notification`] is the single normalized output of the guard: one
//! localized, non-technical message. The [`NotificationEmitter`] broadcasts
//! it to every current subscriber; the [`MessageCatalog`] maps a
//! [`Notice`](crate::failure::Notice) to its localized text, and the
//! [`Notifier`] ties the two together for the classifiers.

mod catalog;
mod emitter;
mod notifier;

pub use catalog::{Locale, MessageCatalog};
pub use emitter::{Listener, NotificationEmitter, SubscriptionId};
pub use notifier::Notifier;

use serde::{Deserialize, Serialize};

/// Name of the broadcast event consumers subscribe to.
pub const GLOBAL_ERROR_EVENT: &str = "globalError";

/// A user-facing failure notification.
///
/// Serializes as `{ "message": "..." }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Localized, human-readable message.
    pub message: String,
}

impl Notification {
    /// Creates a new notification.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the event name this notification is broadcast under.
    pub fn event_name(&self) -> &'static str {
        GLOBAL_ERROR_EVENT
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}
