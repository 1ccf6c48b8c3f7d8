//! Host platform seams.
//!
//! The guard never touches a real document or clock directly. Hosts provide
//! a [`Document`] that can attach new resource elements and a [`Clock`] for
//! cache-busting timestamps. In-memory implementations are provided for tests
//! and headless hosts.

use std::cell::Cell;

use thiserror::Error;

use crate::resource::{NewResource, ResourceElement, ResourceId, ResourceKind};

/// Errors reported by a host platform.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// The document has no head (or equivalent) to attach to.
    #[error("document has no attachment point")]
    NoAttachmentPoint,

    /// The host refused to create or attach the element.
    #[error("failed to attach {kind} element: {reason}")]
    AttachFailed {
        /// Kind of element that was being attached.
        kind: ResourceKind,
        /// Host-supplied reason.
        reason: String,
    },
}

/// The part of the page document the guard mutates.
pub trait Document {
    /// Creates an element from `resource` and appends it to the document head,
    /// which starts a fresh load. Returns the new element's identity.
    fn append_to_head(&mut self, resource: NewResource) -> Result<ResourceId, PlatformError>;
}

/// Source of wall-clock timestamps.
pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// Wall clock backed by `chrono`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A manually advanced clock.
#[derive(Debug, Default)]
pub struct FixedClock {
    now: Cell<i64>,
}

impl FixedClock {
    /// Creates a clock frozen at `millis`.
    pub fn new(millis: i64) -> Self {
        Self {
            now: Cell::new(millis),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, millis: i64) {
        self.now.set(self.now.get() + millis);
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.now.get()
    }
}

/// In-memory document that records attached elements.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    head: Vec<ResourceElement>,
    next_id: u64,
    detached: bool,
}

impl MemoryDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a document whose head is missing; every attach fails.
    pub fn detached() -> Self {
        Self {
            detached: true,
            ..Self::default()
        }
    }

    fn allocate(&mut self) -> ResourceId {
        let id = ResourceId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Embeds a script as the host page would.
    pub fn embed_script(&mut self, src: &str, async_load: bool, defer: bool) -> ResourceElement {
        let element = ResourceElement::script(self.allocate(), src, async_load, defer);
        self.head.push(element.clone());
        element
    }

    /// Embeds a stylesheet as the host page would.
    pub fn embed_stylesheet(&mut self, href: &str) -> ResourceElement {
        let element = ResourceElement::stylesheet(self.allocate(), href);
        self.head.push(element.clone());
        element
    }

    /// Embeds an element with an arbitrary tag.
    pub fn embed(&mut self, tag_name: &str, src: Option<&str>) -> ResourceElement {
        let mut element = ResourceElement::new(self.allocate(), tag_name);
        element.src = src.map(str::to_string);
        self.head.push(element.clone());
        element
    }

    /// Returns every element in the head, in attach order.
    pub fn head(&self) -> &[ResourceElement] {
        &self.head
    }

    /// Looks up an element by identity.
    pub fn get(&self, id: ResourceId) -> Option<&ResourceElement> {
        self.head.iter().find(|element| element.id == id)
    }
}

impl Document for MemoryDocument {
    fn append_to_head(&mut self, resource: NewResource) -> Result<ResourceId, PlatformError> {
        if self.detached {
            return Err(PlatformError::NoAttachmentPoint);
        }
        let id = self.allocate();
        self.head.push(resource.into_element(id));
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::LoadAttributes;

    #[test]
    fn test_fixed_clock_advance() {
        let clock = FixedClock::new(1_000);
        clock.advance(500);
        assert_eq!(clock.now_millis(), 1_500);
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemClock.now_millis() > 1_577_836_800_000);
    }

    #[test]
    fn test_memory_document_ids_are_unique() {
        let mut doc = MemoryDocument::new();
        let a = doc.embed_script("https://x/a.js", true, false);
        let b = doc.embed_stylesheet("https://x/b.css");
        let c = doc
            .append_to_head(NewResource {
                kind: ResourceKind::Script,
                source_url: "https://x/a.js?_retry=1".to_string(),
                attributes: LoadAttributes::script(true, false),
            })
            .unwrap();

        assert_ne!(a.id, b.id);
        assert_ne!(b.id, c);
        assert_eq!(doc.head().len(), 3);
        assert_eq!(
            doc.get(c).and_then(|e| e.source_url()),
            Some("https://x/a.js?_retry=1")
        );
    }

    #[test]
    fn test_detached_document_rejects_attach() {
        let mut doc = MemoryDocument::detached();
        let result = doc.append_to_head(NewResource {
            kind: ResourceKind::Style,
            source_url: "https://x/b.css".to_string(),
            attributes: LoadAttributes::style("stylesheet"),
        });
        assert_eq!(result, Err(PlatformError::NoAttachmentPoint));
    }
}
