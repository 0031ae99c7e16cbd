//! User Entity
//!
//! Local record of a subject that has signed in at least once.

use chrono::{DateTime, Utc};
use kernel::SubjectId;
use kernel::id::UserId;

use crate::domain::provider::IdentityClaims;
use crate::domain::value_object::{email::Email, provider_name::ProviderName};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier
    pub user_id: UserId,
    /// Provider subject, unique across users
    pub subject_id: SubjectId,
    /// Provider the subject was first seen through
    pub provider: ProviderName,
    pub email: Email,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
}

impl User {
    /// Build the record for a subject that just completed a login
    pub fn from_claims(provider: ProviderName, claims: &IdentityClaims) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            subject_id: claims.subject.clone(),
            provider,
            email: claims.email.clone(),
            first_name: claims.first_name.clone(),
            last_name: claims.last_name.clone(),
            created_at: now,
            last_login_at: now,
        }
    }

    /// "First Last", or whichever part is known
    pub fn display_name(&self) -> Option<String> {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            (Some(name), None) | (None, Some(name)) => Some(name.to_string()),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(first: Option<&str>, last: Option<&str>) -> IdentityClaims {
        IdentityClaims {
            subject: SubjectId::new("1234567890").unwrap(),
            email: Email::new("jane@example.com").unwrap(),
            expires_at: Utc::now(),
            first_name: first.map(str::to_string),
            last_name: last.map(str::to_string),
        }
    }

    #[test]
    fn test_from_claims() {
        let google = ProviderName::new("google").unwrap();
        let user = User::from_claims(google.clone(), &claims(Some("Jane"), Some("Doe")));

        assert_eq!(user.subject_id.as_str(), "1234567890");
        assert_eq!(user.provider, google);
        assert_eq!(user.email.as_str(), "jane@example.com");
        assert_eq!(user.display_name().as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_display_name_partial() {
        let google = ProviderName::new("google").unwrap();
        assert_eq!(
            User::from_claims(google.clone(), &claims(None, Some("Doe")))
                .display_name()
                .as_deref(),
            Some("Doe")
        );
        assert!(User::from_claims(google, &claims(None, None)).display_name().is_none());
    }
}
