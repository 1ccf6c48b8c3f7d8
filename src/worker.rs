//! Background-worker registration failures.
//!
//! These are logged and nothing more. They never reach the classifiers and
//! never produce a notification.

use tracing::warn;

/// A failed background-worker registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerFailure {
    /// Registration scope or script URL, when known.
    pub scope: Option<String>,
    /// Platform-supplied description.
    pub message: Option<String>,
}

impl WorkerFailure {
    /// Creates a failure description.
    pub fn new(scope: Option<String>, message: Option<String>) -> Self {
        Self { scope, message }
    }
}

/// Logs a worker registration failure.
pub fn observe_worker_failure(failure: &WorkerFailure) {
    warn!(
        scope = failure.scope.as_deref().unwrap_or("<unknown>"),
        message = failure.message.as_deref().unwrap_or("<no message>"),
        "background worker error"
    );
}
