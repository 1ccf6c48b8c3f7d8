//! loadguard - client-side resilience layer for page failures
//!
//! Classifies failures that escape normal application error flow (failed
//! script/style loads, unhandled rejections, uncaught errors), retries a failed
//! resource load exactly once, and otherwise broadcasts a single localized
//! [`Notification`](notification::Notification) to subscribed listeners.

pub mod config;
pub mod error;
pub mod failure;
pub mod guard;
pub mod logging;
pub mod notification;
pub mod platform;
pub mod rejection;
pub mod resource;
pub mod runtime_error;
pub mod worker;

pub use config::GuardConfig;
pub use error::{GuardError, GuardResult};
pub use guard::{Disposition, FailureGuard, FailureSignal};
pub use notification::{Notification, NotificationEmitter};
