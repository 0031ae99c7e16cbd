//! Vote Ledger Entry

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    ballot::BallotValue,
    poll_id::{PollId, VoteId},
};

/// A recorded vote
#[derive(Debug, Clone)]
pub struct Vote {
    pub vote_id: VoteId,
    pub poll_id: PollId,
    /// Subject ID or pseudonymous address digest
    pub voter_key: String,
    pub value: BallotValue,
    pub created_at: DateTime<Utc>,
}

/// A vote about to be appended to the ledger
#[derive(Debug, Clone)]
pub struct NewVote {
    pub poll_id: PollId,
    pub voter_key: String,
    pub value: BallotValue,
}
