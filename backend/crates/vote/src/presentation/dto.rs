//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entity::{poll::Poll, vote::Vote};

// ============================================================================
// Polls
// ============================================================================

/// Public poll view; the owner is not disclosed
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollResponse {
    pub poll_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub ticker: String,
    pub ballot_alphabet: String,
    pub votes_count: i64,
    pub created_at_ms: i64,
}

impl From<Poll> for PollResponse {
    fn from(poll: Poll) -> Self {
        Self {
            poll_id: poll.poll_id.get(),
            title: poll.title,
            description: poll.description,
            ticker: poll.ticker.as_str().to_string(),
            ballot_alphabet: poll.ballot_alphabet.as_str().to_string(),
            votes_count: poll.votes_count,
            created_at_ms: poll.created_at.timestamp_millis(),
        }
    }
}

/// Create poll request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePollRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub ticker: String,
    #[serde(default)]
    pub ballot_alphabet: Option<String>,
}

/// Create poll response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollCreatedResponse {
    pub poll_id: i64,
}

/// Polls owned by the caller
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollListResponse {
    pub polls: Vec<PollResponse>,
}

// ============================================================================
// Votes
// ============================================================================

/// Cast vote request
#[derive(Debug, Clone, Deserialize)]
pub struct CastVoteRequest {
    pub value: String,
}

/// Cast vote response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteCastResponse {
    pub vote_id: i64,
}

/// Ledger entry without its voter key
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteEntryResponse {
    pub vote_id: i64,
    pub value: String,
    pub created_at_ms: i64,
}

impl From<Vote> for VoteEntryResponse {
    fn from(vote: Vote) -> Self {
        Self {
            vote_id: vote.vote_id.get(),
            value: vote.value.to_string(),
            created_at_ms: vote.created_at.timestamp_millis(),
        }
    }
}

/// Ledger listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteListResponse {
    pub poll_id: i64,
    pub total: i64,
    pub votes: Vec<VoteEntryResponse>,
}
