//! Guard configuration.
//!
//! Configuration is read from a TOML file with `LOADGUARD__` environment
//! overrides. Every field has a default, so an empty file (or no file at all,
//! via [`GuardConfig::default`]) yields the stock behaviour.

use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::error::{GuardError, GuardResult};
use crate::failure::{
    KeywordClassifier, Notice, DEFAULT_NOISE_MARKERS, DEFAULT_RESOURCE_KEYWORDS,
};
use crate::notification::{Locale, MessageCatalog};
use crate::resource::DEFAULT_RETRY_PARAM;

/// Prefix of environment variables that override file values.
pub const ENV_PREFIX: &str = "LOADGUARD";

/// Per-message overrides of the locale catalog.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct MessageOverrides {
    /// Shown when a resource fails again after its retry.
    #[serde(default)]
    pub resource_failed: Option<String>,
    /// Shown for resource-related rejections and runtime errors.
    #[serde(default)]
    pub page_resources_failed: Option<String>,
    /// Shown for everything else.
    #[serde(default)]
    pub generic: Option<String>,
}

/// Resource retry settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RetryConfig {
    /// Cache-busting query parameter appended to retried URLs.
    #[serde(default = "default_query_param")]
    pub query_param: String,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            query_param: default_query_param(),
        }
    }
}

fn default_query_param() -> String {
    DEFAULT_RETRY_PARAM.to_string()
}

/// Message heuristic settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ClassificationConfig {
    /// Case-insensitive keywords marking a message as resource-related.
    #[serde(default = "default_resource_keywords")]
    pub resource_keywords: Vec<String>,
    /// Case-sensitive markers of console-instrumentation noise.
    #[serde(default = "default_noise_markers")]
    pub noise_markers: Vec<String>,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            resource_keywords: default_resource_keywords(),
            noise_markers: default_noise_markers(),
        }
    }
}

fn default_resource_keywords() -> Vec<String> {
    DEFAULT_RESOURCE_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

fn default_noise_markers() -> Vec<String> {
    DEFAULT_NOISE_MARKERS.iter().map(|k| k.to_string()).collect()
}

fn default_true() -> bool {
    true
}

/// Root configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GuardConfig {
    /// Locale of the built-in messages.
    #[serde(default)]
    pub locale: Locale,
    /// Individual message overrides.
    #[serde(default)]
    pub messages: MessageOverrides,
    /// Retry settings.
    #[serde(default)]
    pub retry: RetryConfig,
    /// Classification heuristics.
    #[serde(default)]
    pub classification: ClassificationConfig,
    /// Whether worker registration failures are logged.
    #[serde(default = "default_true")]
    pub observe_worker_errors: bool,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            messages: MessageOverrides::default(),
            retry: RetryConfig::default(),
            classification: ClassificationConfig::default(),
            observe_worker_errors: true,
        }
    }
}

impl GuardConfig {
    /// Loads configuration from a TOML file.
    ///
    /// Environment variables override file values using
    /// `LOADGUARD__<SECTION>__<KEY>` (e.g. `LOADGUARD__RETRY__QUERY_PARAM=cb`).
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist, cannot be parsed, or
    /// fails [`GuardConfig::validate`].
    pub fn load<P: AsRef<Path>>(path: P) -> GuardResult<Self> {
        Self::load_with_env_prefix(path.as_ref(), ENV_PREFIX)
    }

    fn load_with_env_prefix(path: &Path, env_prefix: &str) -> GuardResult<Self> {
        let path_str = path
            .to_str()
            .ok_or_else(|| GuardError::InvalidConfigPath(format!("{:?}", path)))?;

        if !path.exists() {
            return Err(GuardError::ConfigNotFound(path_str.to_string()));
        }

        let config: GuardConfig = Config::builder()
            .add_source(File::new(path_str, FileFormat::Toml))
            .add_source(
                Environment::with_prefix(env_prefix)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from a TOML string, without environment overrides.
    pub fn from_toml_str(toml: &str) -> GuardResult<Self> {
        let config: GuardConfig = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Checks values that deserialize fine but cannot work.
    pub fn validate(&self) -> GuardResult<()> {
        if self.retry.query_param.trim().is_empty() {
            return Err(GuardError::EmptyRetryParam);
        }
        Ok(())
    }

    /// Builds the message catalog: locale defaults plus overrides.
    pub fn catalog(&self) -> MessageCatalog {
        let overrides = [
            (Notice::ResourceFailed, &self.messages.resource_failed),
            (Notice::PageResourcesFailed, &self.messages.page_resources_failed),
            (Notice::Generic, &self.messages.generic),
        ];
        overrides
            .into_iter()
            .fold(MessageCatalog::for_locale(self.locale), |catalog, (notice, text)| {
                match text {
                    Some(text) => catalog.with_message(notice, text.clone()),
                    None => catalog,
                }
            })
    }

    /// Builds the keyword classifier from the configured heuristics.
    pub fn classifier(&self) -> GuardResult<KeywordClassifier> {
        KeywordClassifier::from_keywords(
            self.classification.resource_keywords.as_slice(),
            self.classification.noise_markers.as_slice(),
        )
    }
}
