//! Login State Nonce
//!
//! Single-use CSRF token binding an authorization redirect to the
//! browser session that started it. The same value is sent to the
//! provider as the OIDC `nonce` and must come back inside the ID token.

use platform::crypto::{constant_time_eq, random_alphanumeric};
use std::fmt;

use crate::domain::value_object::provider_name::ProviderName;

/// Length of the random part of a state nonce
pub const STATE_RANDOM_LENGTH: usize = 32;

/// Login state nonce: `<provider>_<32 alphanumerics>`
#[derive(Clone, PartialEq, Eq)]
pub struct StateNonce(String);

impl StateNonce {
    /// Generate a fresh nonce for `provider` from the OS CSPRNG
    pub fn generate(provider: &ProviderName) -> Self {
        Self(format!(
            "{}_{}",
            provider.as_str(),
            random_alphanumeric(STATE_RANDOM_LENGTH)
        ))
    }

    /// Create from database value
    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Constant-time comparison against a value received from the client
    pub fn matches(&self, received: &str) -> bool {
        constant_time_eq(self.0.as_bytes(), received.as_bytes())
    }
}

// Keep the value out of logs.
impl fmt::Debug for StateNonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StateNonce(..)")
    }
}
