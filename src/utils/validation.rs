use crate::utils::error::{RelayError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(RelayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(RelayError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(RelayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_file_extension(field_name: &str, path: &str, allowed_extensions: &[&str]) -> Result<()> {
    match std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(extension) if allowed_extensions.contains(&extension) => Ok(()),
        Some(extension) => Err(RelayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                extension,
                allowed_extensions.join(", ")
            ),
        }),
        None => Err(RelayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| RelayError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RelayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
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
        return Err(RelayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// ISO 4217 樣式：三個大寫英文字母
pub fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("gemini_base_url", "https://example.com").is_ok());
        assert!(validate_url("gemini_base_url", "http://127.0.0.1:8080").is_ok());
        assert!(validate_url("gemini_base_url", "").is_err());
        assert!(validate_url("gemini_base_url", "invalid-url").is_err());
        assert!(validate_url("gemini_base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension("catalog_file", "catalogs.toml", &["toml"]).is_ok());
        assert!(validate_file_extension("catalog_file", "catalogs.json", &["toml"]).is_err());
        assert!(validate_file_extension("catalog_file", "catalogs", &["toml"]).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("key".to_string());
        let missing: Option<String> = None;
        assert_eq!(validate_required_field("gemini_api_key", &present).unwrap(), "key");
        assert!(matches!(
            validate_required_field("gemini_api_key", &missing),
            Err(RelayError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_validate_range_and_strings() {
        assert!(validate_range("request_timeout_secs", 60, 1, 600).is_ok());
        assert!(validate_range("request_timeout_secs", 0, 1, 600).is_err());
        assert!(validate_non_empty_string("model", "gemini-2.0-flash").is_ok());
        assert!(validate_non_empty_string("model", "   ").is_err());
    }

    #[test]
    fn test_currency_code() {
        assert!(is_currency_code("AUD"));
        assert!(is_currency_code("INR"));
        assert!(!is_currency_code("aud"));
        assert!(!is_currency_code("AU"));
        assert!(!is_currency_code("A$D"));
    }
}
