//! Uncaught runtime-error classifier.
//!
//! Checks run in priority order: a resource-related error message wins, then
//! console-instrumentation noise is dropped, and anything left is generic.
//! Default platform reporting is never suppressed on this path.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, error};

use crate::failure::{default_classifier, FailureCategory, MessageClassifier};
use crate::notification::Notifier;
use crate::rejection::json_message;

/// An uncaught synchronous error event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UncaughtError {
    /// Message of the underlying error object, when one was attached.
    pub error_message: Option<String>,
    /// The raw event message.
    pub message: Option<String>,
}

impl UncaughtError {
    /// An event carrying an error object with `message`.
    pub fn from_error_message(message: impl Into<String>) -> Self {
        Self {
            error_message: Some(message.into()),
            message: None,
        }
    }

    /// An event with only a raw message and no error object.
    pub fn from_event_message(message: impl Into<String>) -> Self {
        Self {
            error_message: None,
            message: Some(message.into()),
        }
    }

    /// Reads an event bridged from the host as JSON: `{ "error": { "message" }, "message" }`.
    pub fn from_json(event: &Value) -> Self {
        let message = event
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);
        Self {
            error_message: event.get("error").and_then(json_message),
            message,
        }
    }

    fn error_text(&self) -> Option<&str> {
        self.error_message.as_deref().filter(|m| !m.is_empty())
    }

    fn event_text(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }
}

/// Classifies uncaught runtime errors.
pub struct RuntimeErrorClassifier {
    classifier: Rc<dyn MessageClassifier>,
}

impl Default for RuntimeErrorClassifier {
    fn default() -> Self {
        Self::new(default_classifier())
    }
}

impl fmt::Debug for RuntimeErrorClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeErrorClassifier").finish_non_exhaustive()
    }
}

impl RuntimeErrorClassifier {
    /// Creates a classifier using the given message heuristic.
    pub fn new(classifier: Rc<dyn MessageClassifier>) -> Self {
        Self { classifier }
    }

    /// Classifies an uncaught error without side effects.
    pub fn classify(&self, event: &UncaughtError) -> FailureCategory {
        if let Some(message) = event.error_text() {
            if self.classifier.is_resource_failure(message) {
                return FailureCategory::ResourceRuntimeError;
            }
        }
        match event.event_text() {
            Some(message) if self.classifier.is_console_noise(message) => {
                FailureCategory::ConsoleNoise
            }
            _ => FailureCategory::GenericRuntimeError,
        }
    }

    /// Classifies an uncaught error and broadcasts its notice, if any.
    pub fn handle(&self, event: &UncaughtError, notifier: &mut Notifier) -> FailureCategory {
        error!(
            error = event.error_text().or(event.event_text()).unwrap_or("<no message>"),
            "uncaught error"
        );

        let category = self.classify(event);
        match category.notice() {
            Some(notice) => {
                notifier.notify(notice);
            }
            None => debug!(%category, "suppressed console instrumentation error"),
        }
        category
    }
}
