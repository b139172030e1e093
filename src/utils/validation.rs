//! Checks for configuration values. Every error carries the TOML key of the
//! offending value, e.g. `postal_codes.cache_dir`.

use crate::utils::error::{QrBillError, Result};
use std::path::Path;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> QrBillError {
    QrBillError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Only http(s) sources can be downloaded by the reqwest client.
pub fn validate_url(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, value, "a download URL is required"));
    }

    let url = Url::parse(value).map_err(|e| invalid(field, value, format!("not a URL: {}", e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid(
            field,
            value,
            format!("scheme '{}' cannot be downloaded, use http or https", scheme),
        )),
    }
}

/// A directory that may not exist yet, but must not be an existing file.
pub fn validate_directory(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, value, "directory cannot be empty"));
    }
    if value.contains('\0') {
        return Err(invalid(field, value, "directory contains null bytes"));
    }
    if Path::new(value).is_file() {
        return Err(invalid(field, value, "points at a file, expected a directory"));
    }
    Ok(())
}

pub fn validate_min(field: &str, value: usize, min: usize) -> Result<()> {
    if value < min {
        return Err(invalid(field, value, format!("must be at least {}", min)));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(field, value, format!("must be between {} and {}", min, max)));
    }
    Ok(())
}

/// Case-insensitive choice from a fixed set, e.g. log levels.
pub fn validate_one_of(field: &str, value: &str, allowed: &[&str]) -> Result<()> {
    let normalized = value.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(invalid(field, value, "value cannot be empty"));
    }
    if !allowed.contains(&normalized.as_str()) {
        return Err(invalid(
            field,
            value,
            format!("expected one of: {}", allowed.join(", ")),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_validate_url() {
        assert!(validate_url("postal_codes.source_url", "https://example.com/plz.zip").is_ok());
        assert!(validate_url("postal_codes.source_url", "http://example.com").is_ok());
        assert!(validate_url("postal_codes.source_url", " ").is_err());
        assert!(validate_url("postal_codes.source_url", "invalid-url").is_err());
        assert!(validate_url("postal_codes.source_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_directory() {
        let temp_dir = TempDir::new().unwrap();
        let existing = temp_dir.path().to_str().unwrap();
        assert!(validate_directory("postal_codes.cache_dir", existing).is_ok());
        assert!(validate_directory("postal_codes.cache_dir", "./not-created-yet").is_ok());
        assert!(validate_directory("postal_codes.cache_dir", "").is_err());
        assert!(validate_directory("postal_codes.cache_dir", "cache\0dir").is_err());

        let file = NamedTempFile::new().unwrap();
        match validate_directory("postal_codes.cache_dir", file.path().to_str().unwrap()) {
            Err(QrBillError::InvalidConfigValueError { field, reason, .. }) => {
                assert_eq!(field, "postal_codes.cache_dir");
                assert!(reason.contains("file"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_validate_min_and_range() {
        assert!(validate_min("postal_codes.max_suggestions", 20, 1).is_ok());
        assert!(validate_min("postal_codes.max_suggestions", 0, 1).is_err());

        assert!(validate_range("postal_codes.timeout_seconds", 30u64, 1, 600).is_ok());
        assert!(validate_range("postal_codes.timeout_seconds", 0u64, 1, 600).is_err());
        assert!(validate_range("postal_codes.timeout_seconds", 601u64, 1, 600).is_err());
    }

    #[test]
    fn test_validate_one_of() {
        let levels = ["trace", "debug", "info", "warn", "error"];
        assert!(validate_one_of("logging.level", "info", &levels).is_ok());
        assert!(validate_one_of("logging.level", "WARN", &levels).is_ok());
        assert!(validate_one_of("logging.level", "   ", &levels).is_err());

        let error = validate_one_of("logging.level", "loud", &levels).unwrap_err();
        assert!(error.to_string().contains("expected one of: trace, debug"));
    }
}
