//! Voter Identity
//!
//! The resolved actor behind a request. Produced by the auth context,
//! consumed by the vote ledger, never persisted as such: only its
//! collapsed [`VoterIdentity::voter_key`] is stored.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum accepted length of a provider subject identifier
const SUBJECT_ID_MAX_LENGTH: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubjectIdError {
    #[error("Subject identifier cannot be empty")]
    Empty,
    #[error("Subject identifier must be at most {SUBJECT_ID_MAX_LENGTH} bytes")]
    TooLong,
}

/// Stable subject identifier asserted by the identity provider (`sub` claim)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubjectId(String);

impl SubjectId {
    pub fn new(value: impl Into<String>) -> Result<Self, SubjectIdError> {
        let value = value.into();
        if value.is_empty() {
            return Err(SubjectIdError::Empty);
        }
        if value.len() > SUBJECT_ID_MAX_LENGTH {
            return Err(SubjectIdError::TooLong);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SubjectId {
    type Error = SubjectIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SubjectId> for String {
    fn from(id: SubjectId) -> Self {
        id.0
    }
}

/// One-way digest of a client attribute, used as the voter key of
/// unauthenticated voters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
pub struct PseudonymousKey(String);

impl PseudonymousKey {
    /// Wrap an already computed lowercase hex digest
    pub fn from_hex_digest(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Who is casting a vote
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VoterIdentity {
    /// Signed in through an identity provider
    Authenticated(SubjectId),
    /// Anonymous, keyed by a digest of the client network address
    Pseudonymous(PseudonymousKey),
}

impl VoterIdentity {
    /// The identity collapsed to the string stored in the vote ledger
    pub fn voter_key(&self) -> &str {
        match self {
            VoterIdentity::Authenticated(subject) => subject.as_str(),
            VoterIdentity::Pseudonymous(key) => key.as_str(),
        }
    }

    pub fn subject(&self) -> Option<&SubjectId> {
        match self {
            VoterIdentity::Authenticated(subject) => Some(subject),
            VoterIdentity::Pseudonymous(_) => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, VoterIdentity::Authenticated(_))
    }
}
