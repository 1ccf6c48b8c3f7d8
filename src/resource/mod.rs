//! Resource-load failure handling.
//!
//! Element types, the per-resource retry registry, and the detector that
//! retries a failed script/stylesheet once before reporting it.

mod detector;
mod element;
mod registry;

pub use detector::{cache_bust_url, ResourceFailureDetector, ResourceOutcome, DEFAULT_RETRY_PARAM};
pub use element::{LoadAttributes, NewResource, ResourceElement, ResourceId, ResourceKind};
pub use registry::{ResourceRegistry, RetryState};
