//! Failure classification module
//!
//! This module holds the failure taxonomy and the message heuristics the
//! classifiers use to tell resource-load failures from generic ones.

pub mod classification;
pub mod detector;

pub use classification::{DefaultHandling, FailureCategory, Notice};
pub use detector::{
    default_classifier, KeywordClassifier, MessageClassifier, MessagePattern, DEFAULT_NOISE_MARKERS,
    DEFAULT_RESOURCE_KEYWORDS,
};
