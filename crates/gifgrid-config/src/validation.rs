//! Configuration validation framework

use crate::{ConfigError, ConfigResult};

/// Trait for validating configuration values
pub trait Validate {
    /// Validate this configuration object
    ///
    /// # Errors
    /// Returns validation errors if the configuration is invalid
    fn validate(&self) -> ConfigResult<()>;
}

/// Validate a URL string
///
/// # Errors
/// Returns `ConfigError::InvalidUrl` if the URL is not http(s) or has no host
pub fn validate_url(url: &str, _field_name: &str) -> ConfigResult<()> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !host.starts_with('/') => Ok(()),
        _ => Err(ConfigError::InvalidUrl {
            url: url.to_string(),
        }),
    }
}

/// Validate a value is within a range
///
/// # Errors
/// Returns `ConfigError::OutOfRange` if value is outside the specified range
pub fn validate_range(value: u64, min: u64, max: u64, field_name: &str) -> ConfigResult<()> {
    if value < min || value > max {
        Err(ConfigError::OutOfRange {
            field: field_name.to_string(),
            value,
            min,
            max,
        })
    } else {
        Ok(())
    }
}

/// Validate a string belongs to a fixed set of accepted values
///
/// # Errors
/// Returns `ConfigError::InvalidValue` if the value is not in the set
pub fn validate_one_of(value: &str, allowed: &[&str], field_name: &str) -> ConfigResult<()> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field: field_name.to_string(),
            value: value.to_string(),
            allowed: allowed.join(", "),
        })
    }
}

/// Validate a string is not empty
///
/// # Errors
/// Returns `ConfigError::MissingField` if the string is empty or whitespace-only
pub fn validate_non_empty(value: &str, field_name: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        Err(ConfigError::MissingField {
            field: field_name.to_string(),
        })
    } else {
        Ok(())
    }
}
