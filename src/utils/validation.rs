use crate::utils::error::{AutoMlError, Result};
use std::collections::HashSet;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> AutoMlError {
    AutoMlError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// True when `source` looks like an http(s) location rather than a path.
pub fn is_remote_source(source: &str) -> bool {
    let lowered = source.to_ascii_lowercase();
    lowered.starts_with("http://") || lowered.starts_with("https://")
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(invalid(
                field_name,
                url_str,
                format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(invalid(
            field_name,
            url_str,
            format!("Invalid URL format: {}", e),
        )),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }
    Ok(())
}

/// Validates a dataset location: either an http(s) URL or a file path with an allowed extension.
pub fn validate_source(field_name: &str, source: &str, allowed_extensions: &[&str]) -> Result<()> {
    if is_remote_source(source) {
        return validate_url(field_name, source);
    }
    validate_path(field_name, source)?;
    validate_file_extensions(field_name, &[source.to_string()], allowed_extensions)
}

pub fn validate_file_extensions(
    field_name: &str,
    files: &[String],
    allowed_extensions: &[&str],
) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    for file in files {
        let extension = std::path::Path::new(file)
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| invalid(field_name, file, "File has no extension or invalid filename"))?;
        if !allowed_set.contains(extension.to_ascii_lowercase().as_str()) {
            return Err(invalid(
                field_name,
                file,
                format!(
                    "Unsupported file extension: {}. Allowed extensions: {}",
                    extension,
                    allowed_extensions.join(", ")
                ),
            ));
        }
    }

    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| AutoMlError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

/// Rejects an empty column list.
pub fn check_column_length(columns: &[String]) -> Result<()> {
    if columns.is_empty() {
        return Err(AutoMlError::EmptySelection {
            message: "Expected columns to be at least of length 1, found length of 0 instead"
                .to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("dataset.source", "https://example.com/data.csv").is_ok());
        assert!(validate_url("dataset.source", "http://example.com").is_ok());
        assert!(validate_url("dataset.source", "").is_err());
        assert!(validate_url("dataset.source", "invalid-url").is_err());
        assert!(validate_url("dataset.source", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_source() {
        let allowed = ["csv", "tsv"];
        assert!(validate_source("dataset.source", "data/train.csv", &allowed).is_ok());
        assert!(validate_source("dataset.source", "data/train.CSV", &allowed).is_ok());
        assert!(validate_source("dataset.source", "https://host/api/data", &allowed).is_ok());
        assert!(validate_source("dataset.source", "data/train.parquet", &allowed).is_err());
        assert!(validate_source("dataset.source", "data/train", &allowed).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("threshold", 0.5, 0.0, 1.0).is_ok());
        assert!(validate_range("threshold", 1.5, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_check_column_length() {
        assert!(check_column_length(&["a".to_string()]).is_ok());
        assert!(matches!(
            check_column_length(&[]),
            Err(AutoMlError::EmptySelection { .. })
        ));
    }
}
