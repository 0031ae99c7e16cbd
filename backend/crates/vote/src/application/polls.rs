//! Poll Use Cases
//!
//! Reading polls and their ledger, and owner-only management.

use kernel::VoterIdentity;
use std::sync::Arc;

use crate::application::config::VoteConfig;
use crate::domain::entity::{
    poll::{NewPoll, Poll},
    vote::Vote,
};
use crate::domain::repository::{PollRepository, VoteRepository};
use crate::domain::value_object::{ballot::BallotAlphabet, poll_id::PollId};
use crate::error::{VoteError, VoteResult};

// ============================================================================
// Get Poll
// ============================================================================

/// Get poll use case
pub struct GetPollUseCase<P>
where
    P: PollRepository,
{
    poll_repo: Arc<P>,
}

impl<P> GetPollUseCase<P>
where
    P: PollRepository,
{
    pub fn new(poll_repo: Arc<P>) -> Self {
        Self { poll_repo }
    }

    pub async fn execute(&self, poll_id: PollId) -> VoteResult<Poll> {
        self.poll_repo
            .find_poll(poll_id)
            .await?
            .ok_or(VoteError::PollNotFound(poll_id))
    }
}

// ============================================================================
// Create Poll
// ============================================================================

/// Poll definition as submitted by the client
#[derive(Debug, Clone)]
pub struct CreatePollInput {
    pub title: String,
    pub description: Option<String>,
    pub ticker: String,
    pub ballot_alphabet: Option<String>,
}

/// Create poll use case
pub struct CreatePollUseCase<P>
where
    P: PollRepository,
{
    poll_repo: Arc<P>,
    config: Arc<VoteConfig>,
}

impl<P> CreatePollUseCase<P>
where
    P: PollRepository,
{
    pub fn new(poll_repo: Arc<P>, config: Arc<VoteConfig>) -> Self {
        Self { poll_repo, config }
    }

    pub async fn execute(
        &self,
        creator: &VoterIdentity,
        input: CreatePollInput,
    ) -> VoteResult<Poll> {
        let owner = creator.subject().ok_or(VoteError::Unauthenticated)?;

        let alphabet = match input.ballot_alphabet.as_deref() {
            Some(alphabet) => BallotAlphabet::new(alphabet)?,
            None => BallotAlphabet::new(self.config.default_ballot_alphabet.as_str())?,
        };

        let new_poll = NewPoll::new(
            owner.clone(),
            &input.title,
            input.description.as_deref(),
            &input.ticker,
            alphabet,
            self.config.poll_limits(),
        )?;

        let poll = self.poll_repo.create_poll(&new_poll).await?;
        tracing::info!(poll_id = %poll.poll_id, ticker = %poll.ticker, "Poll created");

        Ok(poll)
    }
}

// ============================================================================
// List Own Polls
// ============================================================================

/// List own polls use case
pub struct ListOwnPollsUseCase<P>
where
    P: PollRepository,
{
    poll_repo: Arc<P>,
}

impl<P> ListOwnPollsUseCase<P>
where
    P: PollRepository,
{
    pub fn new(poll_repo: Arc<P>) -> Self {
        Self { poll_repo }
    }

    pub async fn execute(&self, caller: &VoterIdentity) -> VoteResult<Vec<Poll>> {
        let owner = caller.subject().ok_or(VoteError::Unauthenticated)?;
        self.poll_repo.list_polls_by_owner(owner).await
    }
}

// ============================================================================
// Delete Poll
// ============================================================================

/// Delete poll use case
pub struct DeletePollUseCase<P>
where
    P: PollRepository,
{
    poll_repo: Arc<P>,
}

impl<P> DeletePollUseCase<P>
where
    P: PollRepository,
{
    pub fn new(poll_repo: Arc<P>) -> Self {
        Self { poll_repo }
    }

    /// Polls owned by someone else are reported as not found
    pub async fn execute(&self, caller: &VoterIdentity, poll_id: PollId) -> VoteResult<()> {
        let owner = caller.subject().ok_or(VoteError::Unauthenticated)?;

        if !self.poll_repo.delete_poll_owned(poll_id, owner).await? {
            return Err(VoteError::PollNotFound(poll_id));
        }

        tracing::info!(poll_id = %poll_id, "Poll deleted");
        Ok(())
    }
}

// ============================================================================
// List Votes
// ============================================================================

/// List votes use case
pub struct ListVotesUseCase<P, V>
where
    P: PollRepository,
    V: VoteRepository,
{
    poll_repo: Arc<P>,
    vote_repo: Arc<V>,
    config: Arc<VoteConfig>,
}

impl<P, V> ListVotesUseCase<P, V>
where
    P: PollRepository,
    V: VoteRepository,
{
    pub fn new(poll_repo: Arc<P>, vote_repo: Arc<V>, config: Arc<VoteConfig>) -> Self {
        Self {
            poll_repo,
            vote_repo,
            config,
        }
    }

    /// Newest entries first, at most `votes_list_limit`, plus the total
    pub async fn execute(&self, poll_id: PollId) -> VoteResult<(Vec<Vote>, i64)> {
        if self.poll_repo.find_poll(poll_id).await?.is_none() {
            return Err(VoteError::PollNotFound(poll_id));
        }

        let votes = self
            .vote_repo
            .list_votes_by_poll(poll_id, self.config.votes_list_limit)
            .await?;
        let total = self.vote_repo.count_votes_by_poll(poll_id).await?;

        Ok((votes, total))
    }
}
