//! The failure guard.
//!
//! [`FailureGuard`] owns the three classifiers and the shared [`Notifier`].
//! The host forwards every platform failure to [`FailureGuard::handle`] (or
//! the per-surface shortcuts) from its failure-dispatch callbacks, in the
//! order the platform delivers them. Handling is synchronous and
//! run-to-completion; nothing is queued or awaited.

use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::config::GuardConfig;
use crate::error::GuardResult;
use crate::failure::{default_classifier, DefaultHandling, FailureCategory, MessageClassifier};
use crate::notification::{Notification, NotificationEmitter, Notifier, SubscriptionId};
use crate::platform::{Clock, Document};
use crate::rejection::{RejectionClassifier, RejectionReason};
use crate::resource::{ResourceElement, ResourceFailureDetector, ResourceOutcome};
use crate::runtime_error::{RuntimeErrorClassifier, UncaughtError};
use crate::worker::{observe_worker_failure, WorkerFailure};

/// A failure delivered by the host platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureSignal {
    /// An embedded resource failed to load.
    ResourceLoad(ResourceElement),
    /// An asynchronous rejection went unhandled.
    UnhandledRejection(RejectionReason),
    /// A synchronous error went uncaught.
    RuntimeError(UncaughtError),
    /// A background worker failed to register.
    WorkerRegistration(WorkerFailure),
}

/// What the guard decided for one signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Disposition {
    /// The category assigned, or `None` if the signal was ignored or only logged.
    pub category: Option<FailureCategory>,
    /// Whether the host should keep the platform's default reporting.
    pub default_handling: DefaultHandling,
}

impl Disposition {
    fn from_category(category: Option<FailureCategory>) -> Self {
        Self {
            category,
            default_handling: category
                .map(|c| c.default_handling())
                .unwrap_or_default(),
        }
    }

    /// Returns true if the host should mark the failure handled.
    pub fn suppresses_default(&self) -> bool {
        self.default_handling == DefaultHandling::Suppress
    }
}

/// Classification-and-recovery entry point for page failures.
pub struct FailureGuard<D, C> {
    resources: ResourceFailureDetector<D, C>,
    rejections: RejectionClassifier,
    runtime_errors: RuntimeErrorClassifier,
    notifier: Notifier,
    observe_worker_errors: bool,
}

impl<D: fmt::Debug, C: fmt::Debug> fmt::Debug for FailureGuard<D, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailureGuard")
            .field("resources", &self.resources)
            .field("notifier", &self.notifier)
            .field("observe_worker_errors", &self.observe_worker_errors)
            .finish_non_exhaustive()
    }
}

impl<D: Document, C: Clock> FailureGuard<D, C> {
    /// Creates a guard with the default configuration.
    pub fn new(document: D, clock: C) -> Self {
        Self::assemble(&GuardConfig::default(), document, clock, default_classifier())
    }

    /// Creates a guard from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or a classification
    /// keyword cannot be compiled.
    pub fn from_config(config: &GuardConfig, document: D, clock: C) -> GuardResult<Self> {
        config.validate()?;
        let classifier: Rc<dyn MessageClassifier> = Rc::new(config.classifier()?);
        Ok(Self::assemble(config, document, clock, classifier))
    }

    /// Creates a guard with a custom message heuristic.
    pub fn with_classifier(
        config: &GuardConfig,
        document: D,
        clock: C,
        classifier: Rc<dyn MessageClassifier>,
    ) -> GuardResult<Self> {
        config.validate()?;
        Ok(Self::assemble(config, document, clock, classifier))
    }

    fn assemble(
        config: &GuardConfig,
        document: D,
        clock: C,
        classifier: Rc<dyn MessageClassifier>,
    ) -> Self {
        Self {
            resources: ResourceFailureDetector::with_retry_param(
                document,
                clock,
                config.retry.query_param.clone(),
            ),
            rejections: RejectionClassifier::new(Rc::clone(&classifier)),
            runtime_errors: RuntimeErrorClassifier::new(classifier),
            notifier: Notifier::new(config.catalog()),
            observe_worker_errors: config.observe_worker_errors,
        }
    }

    /// Dispatches one platform failure.
    pub fn handle(&mut self, signal: FailureSignal) -> Disposition {
        match signal {
            FailureSignal::ResourceLoad(element) => {
                Disposition::from_category(self.on_resource_error(&element).category())
            }
            FailureSignal::UnhandledRejection(reason) => {
                Disposition::from_category(Some(self.on_unhandled_rejection(&reason)))
            }
            FailureSignal::RuntimeError(event) => {
                Disposition::from_category(Some(self.on_error(&event)))
            }
            FailureSignal::WorkerRegistration(failure) => {
                self.on_worker_error(&failure);
                Disposition::default()
            }
        }
    }

    /// Handles a resource-load failure.
    pub fn on_resource_error(&mut self, element: &ResourceElement) -> ResourceOutcome {
        self.resources.handle(element, &mut self.notifier)
    }

    /// Handles an unhandled rejection.
    pub fn on_unhandled_rejection(&mut self, reason: &RejectionReason) -> FailureCategory {
        self.rejections.handle(reason, &mut self.notifier)
    }

    /// Handles an uncaught runtime error.
    pub fn on_error(&mut self, event: &UncaughtError) -> FailureCategory {
        self.runtime_errors.handle(event, &mut self.notifier)
    }

    /// Logs a worker registration failure, if enabled.
    pub fn on_worker_error(&mut self, failure: &WorkerFailure) {
        if self.observe_worker_errors {
            observe_worker_failure(failure);
        } else {
            debug!("worker error observation disabled");
        }
    }

    /// Subscribes a callback to notifications.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Notification) + 'static,
    {
        self.notifier.emitter_mut().subscribe(callback)
    }

    /// Returns the emitter for channel subscriptions and unsubscribing.
    pub fn emitter_mut(&mut self) -> &mut NotificationEmitter {
        self.notifier.emitter_mut()
    }

    /// Returns the resource detector (registry and document).
    pub fn resources(&self) -> &ResourceFailureDetector<D, C> {
        &self.resources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{FixedClock, MemoryDocument};
    use std::cell::RefCell;

    #[test]
    fn test_dispositions() {
        let mut guard = FailureGuard::new(MemoryDocument::new(), FixedClock::new(0));

        let rejected = guard.handle(FailureSignal::UnhandledRejection(
            RejectionReason::with_message("Loading chunk 2 failed"),
        ));
        assert_eq!(rejected.category, Some(FailureCategory::ResourceRejection));
        assert!(rejected.suppresses_default());

        let runtime = guard.handle(FailureSignal::RuntimeError(
            UncaughtError::from_error_message("Loading chunk 2 failed"),
        ));
        assert_eq!(runtime.category, Some(FailureCategory::ResourceRuntimeError));
        assert!(!runtime.suppresses_default());

        let worker = guard.handle(FailureSignal::WorkerRegistration(WorkerFailure::default()));
        assert_eq!(worker, Disposition::default());
    }

    #[test]
    fn test_worker_errors_never_notify() {
        let config = GuardConfig {
            observe_worker_errors: false,
            ..GuardConfig::default()
        };
        let mut guard =
            FailureGuard::from_config(&config, MemoryDocument::new(), FixedClock::new(0)).unwrap();
        let seen = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&seen);
        guard.subscribe(move |_| *counter.borrow_mut() += 1);

        guard.on_worker_error(&WorkerFailure::new(
            Some("/sw.js".to_string()),
            Some("registration failed".to_string()),
        ));
        assert_eq!(*seen.borrow(), 0);
    }

    #[derive(Debug)]
    struct NothingIsAResource;

    impl MessageClassifier for NothingIsAResource {
        fn is_resource_failure(&self, _message: &str) -> bool {
            false
        }

        fn is_console_noise(&self, _message: &str) -> bool {
            false
        }
    }

    #[test]
    fn test_custom_classifier() {
        let mut guard = FailureGuard::with_classifier(
            &GuardConfig::default(),
            MemoryDocument::new(),
            FixedClock::new(0),
            Rc::new(NothingIsAResource),
        )
        .unwrap();

        assert_eq!(
            guard.on_unhandled_rejection(&RejectionReason::with_message("Loading chunk 1 failed")),
            FailureCategory::GenericRejection
        );
        assert_eq!(
            guard.on_error(&UncaughtError::from_event_message("console.log")),
            FailureCategory::GenericRuntimeError
        );
    }

    #[test]
    fn test_debug_skips_classifier() {
        let guard = FailureGuard::new(MemoryDocument::new(), FixedClock::new(0));
        let rendered = format!("{:?}", guard);
        assert!(rendered.starts_with("FailureGuard {"));
        assert!(rendered.contains("observe_worker_errors: true"));
        assert_eq!(format!("{:?}", RejectionClassifier::default()), "RejectionClassifier { .. }");
        assert_eq!(
            format!("{:?}", RuntimeErrorClassifier::default()),
            "RuntimeErrorClassifier { .. }"
        );
    }

    #[test]
    fn test_from_config_rejects_blank_param() {
        let mut config = GuardConfig::default();
        config.retry.query_param = String::new();
        assert!(FailureGuard::from_config(&config, MemoryDocument::new(), FixedClock::new(0)).is_err());
    }
}
