//! Builder for [`Fingerprinter`].

use std::sync::Arc;
use std::time::Duration;

use super::config::FingerprintConfig;
use super::protocol::Fingerprinter;
use crate::channel::{ErrorPatterns, PromptGrammar};
use crate::error::{FingerprintError, Result, TemplateError};
use crate::template::{TemplateMatcher, TemplateRepository};
use crate::vendor::VendorRegistry;

/// Builder for constructing a [`Fingerprinter`].
///
/// A template repository is required; everything else has defaults.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use netprint::{FingerprinterBuilder, TemplateRepository};
///
/// # fn example() -> Result<(), netprint::Error> {
/// let fingerprinter = FingerprinterBuilder::new()
///     .repository(TemplateRepository::from_dir("ntc-templates/templates")?)
///     .connect_timeout(Duration::from_secs(10))
///     .neighbor_discovery(false)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct FingerprinterBuilder {
    repository: Option<Arc<TemplateRepository>>,
    config: FingerprintConfig,
    vendors: Option<VendorRegistry>,
    prompt_pattern: Option<String>,
    error_patterns: Option<Vec<String>>,
}

impl FingerprinterBuilder {
    /// Create a builder with default configuration and no repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the template repository (owned or already shared).
    pub fn repository(mut self, repository: impl Into<Arc<TemplateRepository>>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    /// Replace the whole run configuration.
    pub fn config(mut self, config: FingerprintConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the vendor registry.
    pub fn vendors(mut self, vendors: VendorRegistry) -> Self {
        self.vendors = Some(vendors);
        self
    }

    /// Use a custom prompt line pattern.
    pub fn prompt_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.prompt_pattern = Some(pattern.into());
        self
    }

    /// Use custom command error patterns (matched case-insensitively).
    pub fn error_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.error_patterns = Some(patterns.into_iter().map(Into::into).collect());
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the per-read timeout on top of each settle delay.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.config.read_timeout = timeout;
        self
    }

    /// Set the version command (default: `show version`).
    pub fn version_command(mut self, command: impl Into<String>) -> Self {
        self.config.version_command = command.into();
        self
    }

    /// Enable or disable the neighbor phase.
    pub fn neighbor_discovery(mut self, enabled: bool) -> Self {
        self.config.neighbor_discovery = enabled;
        self
    }

    /// Set the confidence a match must exceed before neighbors are fetched.
    pub fn neighbor_min_confidence(mut self, confidence: f64) -> Self {
        self.config.neighbor_min_confidence = confidence;
        self
    }

    /// Build the fingerprinter.
    pub fn build(self) -> Result<Fingerprinter> {
        let repository = self
            .repository
            .ok_or_else(|| TemplateError::RepositoryUnavailable {
                location: "<unset>".to_string(),
                reason: "no template repository configured".to_string(),
            })?;

        let prompt = match self.prompt_pattern {
            Some(pattern) => PromptGrammar::new(&pattern)
                .map_err(|source| FingerprintError::InvalidPattern { pattern, source })?,
            None => PromptGrammar::default(),
        };

        let errors = match self.error_patterns {
            Some(patterns) => {
                let refs: Vec<&str> = patterns.iter().map(String::as_str).collect();
                ErrorPatterns::new(&refs).map_err(|source| FingerprintError::InvalidPattern {
                    pattern: patterns.join(" | "),
                    source,
                })?
            }
            None => ErrorPatterns::default(),
        };

        Ok(Fingerprinter::new(
            self.config,
            TemplateMatcher::new(repository),
            self.vendors.unwrap_or_default(),
            prompt,
            errors,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_repository_required() {
        assert!(matches!(
            FingerprinterBuilder::new().build(),
            Err(Error::Template(TemplateError::RepositoryUnavailable { .. }))
        ));
    }

    #[test]
    fn test_builder_overrides() {
        let fingerprinter = FingerprinterBuilder::new()
            .repository(TemplateRepository::default())
            .connect_timeout(Duration::from_secs(3))
            .read_timeout(Duration::from_millis(250))
            .version_command("display version")
            .neighbor_discovery(false)
            .build()
            .unwrap();

        let config = fingerprinter.config();
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert_eq!(config.read_timeout, Duration::from_millis(250));
        assert_eq!(config.version_command, "display version");
        assert!(!config.neighbor_discovery);
        assert_eq!(config.version_settle, Duration::from_secs(2));
    }

    #[test]
    fn test_invalid_patterns_rejected() {
        let result = FingerprinterBuilder::new()
            .repository(TemplateRepository::default())
            .prompt_pattern("([unclosed")
            .build();
        assert!(matches!(
            result,
            Err(Error::Fingerprint(FingerprintError::InvalidPattern { .. }))
        ));

        let result = FingerprinterBuilder::new()
            .repository(TemplateRepository::default())
            .error_patterns(["% ?error", "(bad"])
            .build();
        assert!(result.is_err());
    }
}
