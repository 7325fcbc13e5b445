//! Form configuration

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading or applying a [`FormConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The YAML document could not be parsed.
    #[error("invalid form configuration")]
    Yaml(#[from] serde_norway::Error),

    /// A length range is empty.
    #[error("{field}: minimum length {min} exceeds maximum length {max}")]
    InvalidLength {
        /// Field the limits apply to
        field: &'static str,
        /// Configured minimum
        min: usize,
        /// Configured maximum
        max: usize,
    },

    /// The logo URL pattern does not compile.
    #[error("invalid logo pattern")]
    Pattern(#[from] regex::Error),
}

/// Inclusive length bounds for a text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LengthLimits {
    /// Minimum number of characters
    pub min: usize,

    /// Maximum number of characters
    pub max: usize,
}

impl LengthLimits {
    /// Create a new range.
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }
}

/// Form configuration.
///
/// Every key is optional; missing keys take the values of
/// [`FormConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Route of the product listing, the destination after a save or cancel
    pub listing_route: String,

    /// Delay between a failed load and the redirect to the listing
    pub load_error_redirect_ms: u64,

    /// Upper bound for a single uniqueness check
    pub verify_timeout_ms: u64,

    /// Identifier length
    pub id_length: LengthLimits,

    /// Name length
    pub name_length: LengthLimits,

    /// Description length
    pub description_length: LengthLimits,

    /// Pattern the logo URL must match
    pub logo_pattern: String,

    /// Reject release dates before today
    pub enforce_min_release_date: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            listing_route: "/products".to_string(),
            load_error_redirect_ms: 2000,
            verify_timeout_ms: 5000,
            id_length: LengthLimits::new(3, 10),
            name_length: LengthLimits::new(5, 100),
            description_length: LengthLimits::new(10, 200),
            logo_pattern: "^https?://.+".to_string(),
            enforce_min_release_date: false,
        }
    }
}

impl FormConfig {
    /// Parse and validate a YAML configuration document.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the document is malformed or a length range
    /// is empty.
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_norway::from_str(source)?;

        config.validate()?;

        Ok(config)
    }

    /// Check the length ranges.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidLength` for the first empty range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        [
            ("id", self.id_length),
            ("name", self.name_length),
            ("description", self.description_length),
        ]
        .into_iter()
        .try_for_each(|(field, limits)| {
            if limits.min <= limits.max {
                Ok(())
            } else {
                Err(ConfigError::InvalidLength {
                    field,
                    min: limits.min,
                    max: limits.max,
                })
            }
        })
    }

    /// Delay before redirecting away from a form whose record failed to load.
    pub fn load_error_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.load_error_redirect_ms)
    }

    /// Bound on a single uniqueness check.
    pub fn verify_timeout(&self) -> Duration {
        Duration::from_millis(self.verify_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn empty_document_yields_defaults() -> TestResult {
        let config = FormConfig::from_yaml("{}")?;

        assert_eq!(config, FormConfig::default());
        assert_eq!(config.load_error_redirect_delay(), Duration::from_secs(2));

        Ok(())
    }

    #[test]
    fn partial_document_overrides_given_keys() -> TestResult {
        let config = FormConfig::from_yaml(
            "listing_route: /catalogue\nid_length:\n  min: 2\n  max: 12\n",
        )?;

        assert_eq!(config.listing_route, "/catalogue");
        assert_eq!(config.id_length, LengthLimits::new(2, 12));
        assert_eq!(config.name_length, LengthLimits::new(5, 100));

        Ok(())
    }

    #[test]
    fn inverted_length_range_is_rejected() {
        let result = FormConfig::from_yaml("name_length:\n  min: 50\n  max: 5\n");

        assert!(
            matches!(
                result,
                Err(ConfigError::InvalidLength {
                    field: "name",
                    min: 50,
                    max: 5
                })
            ),
            "expected an invalid length error, got {result:?}"
        );
    }
}
