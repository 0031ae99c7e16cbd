//! Cast Vote Use Case
//!
//! Appends one ledger entry per (poll, voter key). Uniqueness is left to
//! the repository: two concurrent casts by the same voter both pass the
//! checks here and the store lets exactly one of them commit.

use kernel::VoterIdentity;
use std::sync::Arc;

use crate::domain::entity::vote::NewVote;
use crate::domain::repository::{PollRepository, VoteRepository};
use crate::domain::value_object::{
    ballot::BallotValue,
    poll_id::{PollId, VoteId},
};
use crate::error::{VoteError, VoteResult};

/// Cast vote use case
pub struct CastVoteUseCase<P, V>
where
    P: PollRepository,
    V: VoteRepository,
{
    poll_repo: Arc<P>,
    vote_repo: Arc<V>,
}

impl<P, V> CastVoteUseCase<P, V>
where
    P: PollRepository,
    V: VoteRepository,
{
    pub fn new(poll_repo: Arc<P>, vote_repo: Arc<V>) -> Self {
        Self {
            poll_repo,
            vote_repo,
        }
    }

    pub async fn execute(
        &self,
        poll_id: PollId,
        voter: &VoterIdentity,
        raw_value: &str,
    ) -> VoteResult<VoteId> {
        let poll = self
            .poll_repo
            .find_poll(poll_id)
            .await?
            .ok_or(VoteError::PollNotFound(poll_id))?;

        let value = BallotValue::parse(raw_value, &poll.ballot_alphabet)?;

        let vote = self
            .vote_repo
            .cast_vote(&NewVote {
                poll_id,
                voter_key: voter.voter_key().to_string(),
                value,
            })
            .await?;

        tracing::info!(
            poll_id = %poll_id,
            vote_id = %vote.vote_id,
            authenticated = voter.is_authenticated(),
            "Vote cast"
        );

        Ok(vote.vote_id)
    }
}
