//! Provider Name Value Object
//!
//! Route-safe name of a registered identity provider (`google`, ...).

use derive_more::Display;
use kernel::error::app_error::{AppError, AppResult};

/// Maximum provider name length
const PROVIDER_NAME_MAX_LENGTH: usize = 32;

/// Identity provider name
///
/// Lowercase ASCII letters, digits, `-` and `_`. It prefixes every login
/// state nonce, so it must not contain anything URL-hostile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
pub struct ProviderName(String);

impl ProviderName {
    pub fn new(name: impl Into<String>) -> AppResult<Self> {
        let name = name.into();

        if name.is_empty() || name.len() > PROVIDER_NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Provider name must be 1 to {} characters",
                PROVIDER_NAME_MAX_LENGTH
            )));
        }

        let valid = name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
        if !valid {
            return Err(AppError::bad_request("Invalid provider name"));
        }

        Ok(Self(name))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ProviderName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_name_valid() {
        assert_eq!(ProviderName::new("google").unwrap().as_str(), "google");
        assert!(ProviderName::new("my-idp_2").is_ok());
    }

    #[test]
    fn test_provider_name_invalid() {
        assert!(ProviderName::new("").is_err());
        assert!(ProviderName::new("Google").is_err());
        assert!(ProviderName::new("a/b").is_err());
        assert!(ProviderName::new("x".repeat(33)).is_err());
    }
}
