//! Failure classification types
//!
//! Every failure the guard observes lands in exactly one [`FailureCategory`].
//! The category decides which user-facing notice (if any) is broadcast and
//! whether the platform's default reporting is suppressed.

use std::fmt;

/// The user-facing notice a category maps to.
///
/// The text itself comes from the configured message catalog, so the same
/// notice can be rendered in any supported locale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Notice {
    /// A resource failed again after its one retry.
    ResourceFailed,
    /// Page resources (chunks) failed to load.
    PageResourcesFailed,
    /// Any other failure.
    Generic,
}

/// Whether the platform's own reporting for a failure should still run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DefaultHandling {
    /// Leave default reporting intact so developer tooling still sees it.
    #[default]
    Allow,
    /// Mark the failure handled; the notification already communicates it.
    Suppress,
}

/// The full failure taxonomy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailureCategory {
    /// First failed load of a resource; a retry is scheduled.
    ResourceFirstAttempt,
    /// A resource that was already retried failed again.
    ResourceRetried,
    /// Unhandled rejection whose message points at resource loading.
    ResourceRejection,
    /// Any other unhandled rejection.
    GenericRejection,
    /// Uncaught error whose message points at resource loading.
    ResourceRuntimeError,
    /// Any other uncaught error.
    GenericRuntimeError,
    /// Synthetic error surfaced by development-time console instrumentation.
    ConsoleNoise,
}

impl FailureCategory {
    /// Returns the notice to broadcast, or `None` when nothing is shown.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Self::ResourceFirstAttempt | Self::ConsoleNoise => None,
            Self::ResourceRetried => Some(Notice::ResourceFailed),
            Self::ResourceRejection | Self::ResourceRuntimeError => {
                Some(Notice::PageResourcesFailed)
            }
            Self::GenericRejection | Self::GenericRuntimeError => Some(Notice::Generic),
        }
    }

    /// Returns how the platform's default reporting should be treated.
    ///
    /// Only resource-related rejections are suppressed. Resource-related
    /// runtime errors deliberately are not.
    pub fn default_handling(&self) -> DefaultHandling {
        match self {
            Self::ResourceRejection => DefaultHandling::Suppress,
            _ => DefaultHandling::Allow,
        }
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ResourceFirstAttempt => "resource_first_attempt",
            Self::ResourceRetried => "resource_retried",
            Self::ResourceRejection => "resource_rejection",
            Self::GenericRejection => "generic_rejection",
            Self::ResourceRuntimeError => "resource_runtime_error",
            Self::GenericRuntimeError => "generic_runtime_error",
            Self::ConsoleNoise => "console_noise",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [FailureCategory; 7] = [
        FailureCategory::ResourceFirstAttempt,
        FailureCategory::ResourceRetried,
        FailureCategory::ResourceRejection,
        FailureCategory::GenericRejection,
        FailureCategory::ResourceRuntimeError,
        FailureCategory::GenericRuntimeError,
        FailureCategory::ConsoleNoise,
    ];

    #[test]
    fn test_silent_categories() {
        let silent: Vec<_> = ALL.iter().filter(|c| c.notice().is_none()).collect();
        assert_eq!(
            silent,
            vec![
                &FailureCategory::ResourceFirstAttempt,
                &FailureCategory::ConsoleNoise
            ]
        );
    }

    #[test]
    fn test_only_resource_rejection_suppresses_default() {
        for category in ALL {
            let expected = if category == FailureCategory::ResourceRejection {
                DefaultHandling::Suppress
            } else {
                DefaultHandling::Allow
            };
            assert_eq!(category.default_handling(), expected, "{}", category);
        }
    }

    #[test]
    fn test_notice_mapping() {
        assert_eq!(
            FailureCategory::ResourceRetried.notice(),
            Some(Notice::ResourceFailed)
        );
        assert_eq!(
            FailureCategory::ResourceRejection.notice(),
            FailureCategory::ResourceRuntimeError.notice()
        );
        assert_eq!(
            FailureCategory::GenericRejection.notice(),
            Some(Notice::Generic)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            FailureCategory::ResourceFirstAttempt.to_string(),
            "resource_first_attempt"
        );
        assert_eq!(FailureCategory::ConsoleNoise.to_string(), "console_noise");
    }
}
