//! Localized message catalog.

use serde::Deserialize;

use crate::failure::Notice;

/// Built-in message locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Locale {
    /// Simplified Chinese
    #[default]
    ZhCn,
    /// English
    En,
}

/// The three user-facing messages, resolved for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageCatalog {
    resource_failed: String,
    page_resources_failed: String,
    generic: String,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::for_locale(Locale::default())
    }
}

impl MessageCatalog {
    /// Returns the built-in catalog for a locale.
    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::ZhCn => Self::new(
                "资源加载失败，请刷新页面重试",
                "页面资源加载失败，请刷新页面",
                "页面出现异常，请稍后重试",
            ),
            Locale::En => Self::new(
                "Resource failed to load, please refresh the page",
                "Page resources failed to load, please refresh",
                "The page encountered an error, please try again later",
            ),
        }
    }

    /// Creates a catalog from explicit messages.
    pub fn new(
        resource_failed: impl Into<String>,
        page_resources_failed: impl Into<String>,
        generic: impl Into<String>,
    ) -> Self {
        Self {
            resource_failed: resource_failed.into(),
            page_resources_failed: page_resources_failed.into(),
            generic: generic.into(),
        }
    }

    /// Replaces the message for one notice.
    pub fn with_message(mut self, notice: Notice, message: impl Into<String>) -> Self {
        let slot = match notice {
            Notice::ResourceFailed => &mut self.resource_failed,
            Notice::PageResourcesFailed => &mut self.page_resources_failed,
            Notice::Generic => &mut self.generic,
        };
        *slot = message.into();
        self
    }

    /// Returns the localized text for a notice.
    pub fn message(&self, notice: Notice) -> &str {
        match notice {
            Notice::ResourceFailed => &self.resource_failed,
            Notice::PageResourcesFailed => &self.page_resources_failed,
            Notice::Generic => &self.generic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zh_cn() {
        let catalog = MessageCatalog::default();
        assert_eq!(
            catalog.message(Notice::ResourceFailed),
            "资源加载失败，请刷新页面重试"
        );
        assert_eq!(
            catalog.message(Notice::PageResourcesFailed),
            "页面资源加载失败，请刷新页面"
        );
        assert_eq!(catalog.message(Notice::Generic), "页面出现异常，请稍后重试");
    }

    #[test]
    fn test_english_catalog() {
        let catalog = MessageCatalog::for_locale(Locale::En);
        assert!(catalog
            .message(Notice::Generic)
            .contains("please try again later"));
    }

    #[test]
    fn test_override_single_message() {
        let catalog =
            MessageCatalog::for_locale(Locale::En).with_message(Notice::Generic, "Oops");
        assert_eq!(catalog.message(Notice::Generic), "Oops");
        assert_eq!(
            catalog.message(Notice::ResourceFailed),
            "Resource failed to load, please refresh the page"
        );
    }
}
