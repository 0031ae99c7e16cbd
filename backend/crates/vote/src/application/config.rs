//! Application Configuration
//!
//! Configuration for the Vote application layer.

use crate::domain::entity::poll::PollLimits;
use crate::domain::value_object::ballot::DEFAULT_BALLOT_ALPHABET;

/// Vote application configuration
#[derive(Debug, Clone)]
pub struct VoteConfig {
    /// Ballot alphabet of polls created without one
    pub default_ballot_alphabet: String,
    /// Maximum poll title length, in characters
    pub title_max_length: usize,
    /// Maximum poll description length, in characters
    pub description_max_length: usize,
    /// Maximum number of ledger entries returned by a listing
    pub votes_list_limit: i64,
}

impl Default for VoteConfig {
    fn default() -> Self {
        Self {
            default_ballot_alphabet: DEFAULT_BALLOT_ALPHABET.to_string(),
            title_max_length: 200,
            description_max_length: 2000,
            votes_list_limit: 100,
        }
    }
}

impl VoteConfig {
    pub fn poll_limits(&self) -> PollLimits {
        PollLimits {
            title_max_length: self.title_max_length,
            description_max_length: self.description_max_length,
        }
    }
}
