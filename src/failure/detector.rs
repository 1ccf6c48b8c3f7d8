//! Message heuristics for failure classification
//!
//! Platform error text is not structured, so resource-load failures are
//! recognised by keyword ("chunk", "loading") and development-time console
//! instrumentation by marker ("console."). The heuristic lives behind the
//! [`MessageClassifier`] trait so call sites never depend on the matching
//! strategy.

use std::rc::Rc;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{GuardError, GuardResult};

/// Default keywords that mark a message as resource-related.
pub const DEFAULT_RESOURCE_KEYWORDS: &[&str] = &["chunk", "loading"];

/// Default markers that identify synthetic console-instrumentation errors.
pub const DEFAULT_NOISE_MARKERS: &[&str] = &["console."];

static BUILTIN: OnceLock<KeywordClassifier> = OnceLock::new();

thread_local! {
    static SHARED: Rc<dyn MessageClassifier> = Rc::new(KeywordClassifier::builtin().clone());
}

/// Returns the built-in classifier as a shared handle.
///
/// Every call on a thread returns the same allocation.
pub fn default_classifier() -> Rc<dyn MessageClassifier> {
    SHARED.with(Rc::clone)
}

/// Decides what a free-text failure message means.
pub trait MessageClassifier {
    /// Returns true if the message describes a failed resource/chunk load.
    fn is_resource_failure(&self, message: &str) -> bool;

    /// Returns true if the message is noise from console instrumentation.
    fn is_console_noise(&self, message: &str) -> bool;
}

/// A compiled pattern for matching failure messages.
#[derive(Debug, Clone)]
pub struct MessagePattern {
    regex: Regex,
    description: String,
}

impl MessagePattern {
    /// Compiles a raw regex pattern.
    pub fn new(pattern: &str, description: impl Into<String>) -> GuardResult<Self> {
        let regex = Regex::new(pattern).map_err(|source| GuardError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            regex,
            description: description.into(),
        })
    }

    /// Builds a pattern matching `keyword` as a literal substring.
    pub fn keyword(keyword: &str, case_insensitive: bool) -> GuardResult<Self> {
        let escaped = regex::escape(keyword);
        let pattern = if case_insensitive {
            format!("(?i){}", escaped)
        } else {
            escaped
        };
        Self::new(&pattern, keyword)
    }

    /// Returns the description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Checks if this pattern matches the given text.
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Keyword-based classifier.
///
/// Resource keywords match case-insensitively; noise markers match exactly.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    resource_patterns: Vec<MessagePattern>,
    noise_patterns: Vec<MessagePattern>,
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordClassifier {
    /// Creates a classifier with the built-in keywords.
    pub fn new() -> Self {
        Self::builtin().clone()
    }

    /// Returns the built-in classifier, compiled on first use.
    pub fn builtin() -> &'static KeywordClassifier {
        BUILTIN.get_or_init(|| {
            // The built-in keywords are escaped literals and always compile.
            Self::from_keywords(DEFAULT_RESOURCE_KEYWORDS, DEFAULT_NOISE_MARKERS)
                .expect("built-in keywords are valid patterns")
        })
    }

    /// Creates a classifier from keyword lists. Blank entries are skipped.
    pub fn from_keywords<R, N>(resource_keywords: &[R], noise_markers: &[N]) -> GuardResult<Self>
    where
        R: AsRef<str>,
        N: AsRef<str>,
    {
        Ok(Self {
            resource_patterns: compile_keywords(resource_keywords, true)?,
            noise_patterns: compile_keywords(noise_markers, false)?,
        })
    }

    /// Creates a classifier from pre-built patterns.
    pub fn with_patterns(
        resource_patterns: Vec<MessagePattern>,
        noise_patterns: Vec<MessagePattern>,
    ) -> Self {
        Self {
            resource_patterns,
            noise_patterns,
        }
    }

    /// Returns the resource patterns, in match order.
    pub fn resource_patterns(&self) -> &[MessagePattern] {
        &self.resource_patterns
    }

    /// Returns the console-noise patterns.
    pub fn noise_patterns(&self) -> &[MessagePattern] {
        &self.noise_patterns
    }
}

fn compile_keywords<K: AsRef<str>>(
    keywords: &[K],
    case_insensitive: bool,
) -> GuardResult<Vec<MessagePattern>> {
    let mut patterns = Vec::with_capacity(keywords.len());
    for keyword in keywords {
        let keyword: &str = keyword.as_ref();
        if keyword.trim().is_empty() {
            continue;
        }
        patterns.push(MessagePattern::keyword(keyword, case_insensitive)?);
    }
    Ok(patterns)
}

impl MessageClassifier for KeywordClassifier {
    fn is_resource_failure(&self, message: &str) -> bool {
        self.resource_patterns.iter().any(|p| p.matches(message))
    }

    fn is_console_noise(&self, message: &str) -> bool {
        self.noise_patterns.iter().any(|p| p.matches(message))
    }
}
