//! Unhandled-rejection classifier.
//!
//! A rejection whose reason message mentions resource loading is reported with
//! the page-resources notice and its default platform reporting is
//! suppressed. Everything else gets the generic notice and keeps default
//! reporting.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use tracing::error;

use crate::failure::{default_classifier, FailureCategory, MessageClassifier};
use crate::notification::Notifier;

/// The reason an asynchronous operation was rejected with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RejectionReason {
    message: Option<String>,
}

impl RejectionReason {
    /// A reason carrying an error message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// A reason with no message (a bare value, `undefined`, ...).
    pub fn opaque() -> Self {
        Self::default()
    }

    /// A reason built from a Rust error.
    pub fn from_error(err: &dyn std::error::Error) -> Self {
        Self::with_message(err.to_string())
    }

    /// Reads a reason bridged from the host as JSON.
    ///
    /// Only an object with a string `message` field carries a message; bare
    /// strings and other values are opaque.
    pub fn from_json(reason: &Value) -> Self {
        Self {
            message: json_message(reason),
        }
    }

    /// Returns the message, treating an empty one as absent.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }
}

pub(crate) fn json_message(value: &Value) -> Option<String> {
    value
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// Classifies unhandled rejections.
pub struct RejectionClassifier {
    classifier: Rc<dyn MessageClassifier>,
}

impl Default for RejectionClassifier {
    fn default() -> Self {
        Self::new(default_classifier())
    }
}

impl fmt::Debug for RejectionClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RejectionClassifier").finish_non_exhaustive()
    }
}

impl RejectionClassifier {
    /// Creates a classifier using the given message heuristic.
    pub fn new(classifier: Rc<dyn MessageClassifier>) -> Self {
        Self { classifier }
    }

    /// Classifies a rejection without side effects.
    pub fn classify(&self, reason: &RejectionReason) -> FailureCategory {
        match reason.message() {
            Some(message) if self.classifier.is_resource_failure(message) => {
                FailureCategory::ResourceRejection
            }
            _ => FailureCategory::GenericRejection,
        }
    }

    /// Classifies a rejection and broadcasts its notice.
    ///
    /// The returned category's
    /// [`default_handling`](FailureCategory::default_handling) tells the host
    /// whether to mark the rejection handled.
    pub fn handle(&self, reason: &RejectionReason, notifier: &mut Notifier) -> FailureCategory {
        error!(
            reason = reason.message().unwrap_or("<no message>"),
            "unhandled promise rejection"
        );

        let category = self.classify(reason);
        if let Some(notice) = category.notice() {
            notifier.notify(notice);
        }
        category
    }
}
