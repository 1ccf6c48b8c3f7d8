//! Resource-load failure detector
//!
//! Drives the one-shot retry protocol: the first failure of a script or
//! stylesheet re-attaches a cache-busted copy, any later failure of the same
//! resource (or of its replacement) is reported to the user.

use tracing::{error, info, warn};

use crate::failure::{FailureCategory, Notice};
use crate::notification::Notifier;
use crate::platform::{Clock, Document};

use super::{NewResource, ResourceElement, ResourceId, ResourceRegistry};

/// Default cache-busting query parameter.
pub const DEFAULT_RETRY_PARAM: &str = "_retry";

/// What the detector did with a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceOutcome {
    /// Unsupported element or no source URL; nothing happened.
    Ignored,
    /// A fresh copy was attached; no notification.
    Retried {
        /// The newly attached element.
        replacement: ResourceId,
        /// Its cache-busted URL.
        retry_url: String,
    },
    /// The failure was reported to the user.
    Reported,
}

impl ResourceOutcome {
    /// Returns the failure category, or `None` when ignored.
    pub fn category(&self) -> Option<FailureCategory> {
        match self {
            Self::Ignored => None,
            Self::Retried { .. } => Some(FailureCategory::ResourceFirstAttempt),
            Self::Reported => Some(FailureCategory::ResourceRetried),
        }
    }
}

/// Appends `param=<timestamp>` to `url`, using `&` if it already has a query.
pub fn cache_bust_url(url: &str, param: &str, timestamp_ms: i64) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}={}", url, separator, param, timestamp_ms)
}

/// Observes failed resource loads and retries each resource at most once.
#[derive(Debug)]
pub struct ResourceFailureDetector<D, C> {
    document: D,
    clock: C,
    registry: ResourceRegistry,
    retry_param: String,
}

impl<D: Document, C: Clock> ResourceFailureDetector<D, C> {
    /// Creates a detector using the default `_retry` parameter.
    pub fn new(document: D, clock: C) -> Self {
        Self::with_retry_param(document, clock, DEFAULT_RETRY_PARAM)
    }

    /// Creates a detector with a custom cache-busting parameter.
    pub fn with_retry_param(document: D, clock: C, retry_param: impl Into<String>) -> Self {
        Self {
            document,
            clock,
            registry: ResourceRegistry::new(),
            retry_param: retry_param.into(),
        }
    }

    /// Handles one resource-load failure.
    pub fn handle(&mut self, element: &ResourceElement, notifier: &mut Notifier) -> ResourceOutcome {
        let Some(kind) = element.kind() else {
            return ResourceOutcome::Ignored;
        };
        let Some(source_url) = element.source_url() else {
            return ResourceOutcome::Ignored;
        };

        warn!(id = %element.id, %kind, url = source_url, "resource failed to load");

        if self.registry.has_been_retried(element.id) {
            notifier.notify(Notice::ResourceFailed);
            return ResourceOutcome::Reported;
        }

        let now = self.clock.now_millis();
        let retry_url = cache_bust_url(source_url, &self.retry_param, now);
        // Flag first: a failure of the retry must never see an unmarked original.
        self.registry.mark_retried(element.id);

        let resource = NewResource {
            kind,
            source_url: retry_url.clone(),
            attributes: element.attributes.retained_for(kind),
        };
        match self.document.append_to_head(resource) {
            Ok(replacement) => {
                self.registry.record_replacement(element.id, replacement);
                info!(id = %element.id, %replacement, url = %retry_url, "retrying resource load");
                ResourceOutcome::Retried {
                    replacement,
                    retry_url,
                }
            }
            Err(err) => {
                error!(id = %element.id, error = %err, "could not attach retry element");
                notifier.notify(Notice::ResourceFailed);
                ResourceOutcome::Reported
            }
        }
    }

    /// Returns the retry registry.
    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Returns the document.
    pub fn document(&self) -> &D {
        &self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::{MessageCatalog, Notification};
    use crate::platform::{FixedClock, MemoryDocument, PlatformError};
    use crate::resource::{LoadAttributes, ResourceKind};
    use tokio::sync::mpsc::UnboundedReceiver;

    fn setup() -> (
        ResourceFailureDetector<MemoryDocument, FixedClock>,
        Notifier,
        UnboundedReceiver<Notification>,
    ) {
        let detector = ResourceFailureDetector::new(MemoryDocument::new(), FixedClock::new(1_700));
        let mut notifier = Notifier::new(MessageCatalog::default());
        let (_, rx) = notifier.emitter_mut().subscribe_channel();
        (detector, notifier, rx)
    }

    fn drain(rx: &mut UnboundedReceiver<Notification>) -> Vec<String> {
        std::iter::from_fn(|| rx.try_recv().ok())
            .map(|n| n.message)
            .collect()
    }

    #[test]
    fn test_cache_bust_url_separator() {
        assert_eq!(
            cache_bust_url("https://x/app.js", "_retry", 5),
            "https://x/app.js?_retry=5"
        );
        assert_eq!(
            cache_bust_url("https://x/app.css?v=2", "_retry", 5),
            "https://x/app.css?v=2&_retry=5"
        );
    }

    #[test]
    fn test_first_failure_retries_script() {
        let (mut detector, mut notifier, mut rx) = setup();
        let script = ResourceElement::script(ResourceId(100), "https://x/app.js", true, false);

        let outcome = detector.handle(&script, &mut notifier);

        let (replacement, retry_url) = match outcome {
            ResourceOutcome::Retried {
                replacement,
                retry_url,
            } => (replacement, retry_url),
            other => panic!("expected a retry, got {:?}", other),
        };
        assert_eq!(retry_url, "https://x/app.js?_retry=1700");
        assert!(detector.registry().has_been_retried(script.id));

        let head = detector.document().head();
        assert_eq!(head.len(), 1);
        let inserted = &head[0];
        assert_eq!(inserted.id, replacement);
        assert_eq!(inserted.kind(), Some(ResourceKind::Script));
        assert_eq!(inserted.src.as_deref(), Some("https://x/app.js?_retry=1700"));
        assert_eq!(inserted.attributes, LoadAttributes::script(true, false));
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_second_failure_reports_once() {
        let (mut detector, mut notifier, mut rx) = setup();
        let style = ResourceElement::stylesheet(ResourceId(7), "https://x/app.css");

        detector.handle(&style, &mut notifier);
        let outcome = detector.handle(&style, &mut notifier);

        assert_eq!(outcome, ResourceOutcome::Reported);
        assert_eq!(detector.document().head().len(), 1);
        assert_eq!(drain(&mut rx), vec!["资源加载失败，请刷新页面重试"]);
    }

    #[test]
    fn test_replacement_failure_is_reported() {
        let (mut detector, mut notifier, mut rx) = setup();
        let style = ResourceElement::stylesheet(ResourceId(7), "https://x/app.css");

        detector.handle(&style, &mut notifier);
        let replacement = detector.document().head()[0].clone();
        let outcome = detector.handle(&replacement, &mut notifier);

        assert_eq!(outcome, ResourceOutcome::Reported);
        assert_eq!(detector.document().head().len(), 1);
        assert_eq!(drain(&mut rx).len(), 1);
    }

    #[test]
    fn test_unsupported_elements_ignored() {
        let (mut detector, mut notifier, mut rx) = setup();
        let mut image = ResourceElement::new(ResourceId(1), "img");
        image.src = Some("https://x/logo.png".to_string());
        let empty_script = ResourceElement::new(ResourceId(2), "script");

        assert_eq!(detector.handle(&image, &mut notifier), ResourceOutcome::Ignored);
        assert_eq!(
            detector.handle(&empty_script, &mut notifier),
            ResourceOutcome::Ignored
        );
        assert!(detector.registry().is_empty());
        assert!(detector.document().head().is_empty());
        assert!(drain(&mut rx).is_empty());
    }

    struct RefusingDocument;

    impl Document for RefusingDocument {
        fn append_to_head(&mut self, resource: NewResource) -> Result<ResourceId, PlatformError> {
            Err(PlatformError::AttachFailed {
                kind: resource.kind,
                reason: "sandboxed".to_string(),
            })
        }
    }

    #[test]
    fn test_attach_failure_reports_instead_of_retrying() {
        let mut detector = ResourceFailureDetector::new(RefusingDocument, FixedClock::new(0));
        let mut notifier = Notifier::new(MessageCatalog::default());
        let (_, mut rx) = notifier.emitter_mut().subscribe_channel();
        let script = ResourceElement::script(ResourceId(3), "https://x/a.js", false, true);

        assert_eq!(
            detector.handle(&script, &mut notifier),
            ResourceOutcome::Reported
        );
        assert!(detector.registry().has_been_retried(script.id));
        assert_eq!(drain(&mut rx).len(), 1);
    }

    #[test]
    fn test_custom_retry_param() {
        let mut detector = ResourceFailureDetector::with_retry_param(
            MemoryDocument::new(),
            FixedClock::new(42),
            "cb",
        );
        let mut notifier = Notifier::default();
        let script = ResourceElement::script(ResourceId(3), "/static/a.js?x=1", false, false);

        let outcome = detector.handle(&script, &mut notifier);
        assert!(matches!(
            outcome,
            ResourceOutcome::Retried { ref retry_url, .. } if retry_url == "/static/a.js?x=1&cb=42"
        ));
    }
}
