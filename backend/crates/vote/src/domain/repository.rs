//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::SubjectId;

use crate::domain::entity::{
    poll::{NewPoll, Poll},
    vote::{NewVote, Vote},
};
use crate::domain::value_object::poll_id::PollId;
use crate::error::VoteResult;

/// Poll store
#[trait_variant::make(PollRepository: Send)]
pub trait LocalPollRepository {
    /// Find poll by id
    async fn find_poll(&self, poll_id: PollId) -> VoteResult<Option<Poll>>;

    /// Insert a poll with a zero counter
    async fn create_poll(&self, poll: &NewPoll) -> VoteResult<Poll>;

    /// Polls created by `owner`, newest first
    async fn list_polls_by_owner(&self, owner: &SubjectId) -> VoteResult<Vec<Poll>>;

    /// Delete a poll and its ledger if `owner` created it
    ///
    /// Returns `false` when no such poll is owned by `owner`.
    async fn delete_poll_owned(&self, poll_id: PollId, owner: &SubjectId) -> VoteResult<bool>;
}

/// Vote ledger
#[trait_variant::make(VoteRepository: Send)]
pub trait LocalVoteRepository {
    /// Append a ledger entry and increment the poll counter, atomically
    ///
    /// Fails with `DuplicateVote` when the voter key already has an entry
    /// for the poll, and `PollNotFound` when the poll is gone. Nothing is
    /// written on failure.
    async fn cast_vote(&self, vote: &NewVote) -> VoteResult<Vote>;

    /// Most recent entries of a poll, newest first
    async fn list_votes_by_poll(&self, poll_id: PollId, limit: i64) -> VoteResult<Vec<Vote>>;

    /// Number of ledger entries of a poll
    async fn count_votes_by_poll(&self, poll_id: PollId) -> VoteResult<i64>;
}
