//! Ballot Values
//!
//! A poll declares its accepted values as an alphabet of single
//! characters (`"yn"` for yes/no). A ballot is one member of it.

use std::fmt;

use crate::error::{VoteError, VoteResult};

/// Alphabet used when a poll does not declare one
pub const DEFAULT_BALLOT_ALPHABET: &str = "yn";

/// Maximum number of distinct ballot values per poll
pub const BALLOT_ALPHABET_MAX_LENGTH: usize = 16;

/// Accepted ballot values of a poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BallotAlphabet(String);

impl BallotAlphabet {
    /// Distinct, visible, non-whitespace characters
    pub fn new(alphabet: impl Into<String>) -> VoteResult<Self> {
        let alphabet = alphabet.into();
        let count = alphabet.chars().count();

        if count == 0 || count > BALLOT_ALPHABET_MAX_LENGTH {
            return Err(VoteError::InvalidPoll(format!(
                "ballot alphabet must have 1 to {} values",
                BALLOT_ALPHABET_MAX_LENGTH
            )));
        }
        if alphabet.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(VoteError::InvalidPoll(
                "ballot values must be visible characters".to_string(),
            ));
        }
        let mut seen: Vec<char> = alphabet.chars().collect();
        seen.sort_unstable();
        seen.dedup();
        if seen.len() != count {
            return Err(VoteError::InvalidPoll(
                "ballot values must be distinct".to_string(),
            ));
        }

        Ok(Self(alphabet))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(alphabet: impl Into<String>) -> Self {
        Self(alphabet.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn contains(&self, value: char) -> bool {
        self.0.contains(value)
    }
}

impl Default for BallotAlphabet {
    fn default() -> Self {
        Self(DEFAULT_BALLOT_ALPHABET.to_string())
    }
}

/// A single cast value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BallotValue(char);

impl BallotValue {
    /// Accept `raw` only if it is exactly one character of `alphabet`
    ///
    /// No trimming or case folding: `"Y"` is not `"y"`.
    pub fn parse(raw: &str, alphabet: &BallotAlphabet) -> VoteResult<Self> {
        let mut chars = raw.chars();
        let (Some(value), None) = (chars.next(), chars.next()) else {
            return Err(VoteError::InvalidValue(format!(
                "expected exactly one of \"{}\"",
                alphabet.as_str()
            )));
        };

        if !alphabet.contains(value) {
            return Err(VoteError::InvalidValue(format!(
                "'{}' is not one of \"{}\"",
                value,
                alphabet.as_str()
            )));
        }

        Ok(Self(value))
    }

    /// Create from database value
    pub fn from_db(value: &str) -> VoteResult<Self> {
        value
            .chars()
            .next()
            .map(Self)
            .ok_or_else(|| VoteError::Internal("empty ballot value in ledger".to_string()))
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

impl fmt::Display for BallotValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
