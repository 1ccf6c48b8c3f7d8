//! Per-resource retry state.

use std::collections::HashMap;

use super::ResourceId;

/// Why a resource counts as already retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryState {
    /// The resource itself failed once and a retry was issued.
    Retried {
        /// The element created for the retry, once attached.
        replacement: Option<ResourceId>,
    },
    /// The resource is the replacement created by retrying `original`.
    Replacement {
        /// The element whose failure produced this one.
        original: ResourceId,
    },
}

/// Registry of resources that have used up their single retry.
///
/// A resource absent from the registry has not been retried. Entries are
/// never removed: the flag lives as long as the page.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    entries: HashMap<ResourceId, RetryState>,
}

impl ResourceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `id` has already been retried, directly or as a replacement.
    pub fn has_been_retried(&self, id: ResourceId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Returns the retry state of `id`.
    pub fn state(&self, id: ResourceId) -> Option<&RetryState> {
        self.entries.get(&id)
    }

    /// Marks `id` as retried. Returns false, leaving the entry untouched, if it
    /// was already marked.
    pub fn mark_retried(&mut self, id: ResourceId) -> bool {
        if self.entries.contains_key(&id) {
            return false;
        }
        self.entries.insert(id, RetryState::Retried { replacement: None });
        true
    }

    /// Links the retry element to its original. The replacement inherits the
    /// spent retry, so its own failure is reported rather than retried.
    pub fn record_replacement(&mut self, original: ResourceId, replacement: ResourceId) {
        if let Some(RetryState::Retried {
            replacement: slot, ..
        }) = self.entries.get_mut(&original)
        {
            *slot = Some(replacement);
        }
        self.entries
            .entry(replacement)
            .or_insert(RetryState::Replacement { original });
    }

    /// Returns the number of tracked resources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been retried yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
