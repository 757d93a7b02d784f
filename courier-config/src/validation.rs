// Configuration validation

use crate::{ConfigError, Result};

/// Trait for validating configuration
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Reusable validation rules
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate that a value is not empty
    pub fn not_empty(value: &str, field: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                field
            )));
        }
        Ok(())
    }

    /// Validate that a value is an absolute http(s) URL
    pub fn is_url(value: &str, field: &str) -> Result<()> {
        let parsed = url::Url::parse(value).map_err(|e| {
            ConfigError::ValidationError(format!("{} must be a valid URL: {}", field, e))
        })?;

        match parsed.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ConfigError::ValidationError(format!(
                "{} must use http or https, got {}",
                field, scheme
            ))),
        }
    }
}
