use crate::utils::error::{Result, SiteError};
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
            .unwrap_or_else(|e| panic!("email pattern must compile: {}", e))
    })
}

/// Checks that `value` can serve as the content backend origin: an http(s)
/// URL with a host, and nothing after the path that request paths could
/// not be appended to.
pub fn validate_origin(field_name: &str, value: &str) -> Result<()> {
    let invalid = |reason: String| SiteError::InvalidConfigValue {
        field: field_name.to_string(),
        value: value.to_string(),
        reason,
    };

    if value.trim().is_empty() {
        return Err(invalid("URL cannot be empty".to_string()));
    }
    let url = Url::parse(value).map_err(|e| invalid(format!("Invalid URL format: {}", e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("Unsupported URL scheme: {}", url.scheme())));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("URL has no host".to_string()));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("Origin must not carry a query or fragment".to_string()));
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(SiteError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SiteError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Local check for the newsletter form. Surrounding whitespace is ignored.
pub fn validate_email(field_name: &str, value: &str) -> Result<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SiteError::validation(field_name, "Email is required"));
    }
    if !email_pattern().is_match(trimmed) {
        return Err(SiteError::validation(field_name, "Invalid email address"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_validate_origin() {
        assert_ok!(validate_origin("base_url", "https://cms.example.com"));
        assert_ok!(validate_origin("base_url", "http://localhost:1337/"));
        assert_ok!(validate_origin("base_url", "https://example.com/cms"));
        assert_err!(validate_origin("base_url", ""));
        assert_err!(validate_origin("base_url", "invalid-url"));
        assert_err!(validate_origin("base_url", "ftp://example.com"));
        assert_err!(validate_origin("base_url", "https://cms.example.com/?preview=1"));
        assert_err!(validate_origin("base_url", "https://cms.example.com/#top"));
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("timeout_seconds", 5, 1).is_ok());
        assert!(validate_positive_number("timeout_seconds", 0, 1).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("email", "client@firm.ae").is_ok());
        assert!(validate_email("email", "  first.last+news@mail.example.com ").is_ok());

        let err = validate_email("email", "   ").unwrap_err();
        assert_eq!(err.user_friendly_message(), "Email is required");

        for bad in ["plainaddress", "@no-local.com", "user@", "user@host", "a b@c.com"] {
            let err = validate_email("email", bad).unwrap_err();
            assert!(matches!(err, SiteError::Validation { .. }), "{bad} should fail");
        }
    }
}
