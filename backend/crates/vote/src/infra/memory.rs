//! In-Memory Implementations
//!
//! Process-local poll store and ledger behind a single lock, so the
//! ledger insert and the counter increment are observed together.
//! Used by tests and local runs without a database.

use chrono::Utc;
use kernel::SubjectId;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::entity::{
    poll::{NewPoll, Poll},
    vote::{NewVote, Vote},
};
use crate::domain::repository::{PollRepository, VoteRepository};
use crate::domain::value_object::{
    ballot::BallotAlphabet,
    poll_id::{PollId, VoteId},
    ticker::Ticker,
};
use crate::error::{VoteError, VoteResult};

#[derive(Default)]
struct MemoryVoteState {
    polls: BTreeMap<PollId, Poll>,
    votes: Vec<Vote>,
    next_poll_id: i64,
    next_vote_id: i64,
}

/// In-memory vote repository
#[derive(Clone, Default)]
pub struct MemoryVoteRepository {
    state: Arc<Mutex<MemoryVoteState>>,
    fail_next_increment: Arc<AtomicBool>,
}

impl MemoryVoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an ownerless poll with a fixed id and a zero counter
    pub fn seed_poll(&self, poll_id: i64, ticker: &str, alphabet: &str) -> VoteResult<Poll> {
        let poll = Poll {
            poll_id: PollId::new(poll_id),
            title: format!("{} poll", ticker),
            description: None,
            ticker: Ticker::new(ticker)?,
            owner_subject_id: None,
            ballot_alphabet: BallotAlphabet::new(alphabet)?,
            votes_count: 0,
            created_at: Utc::now(),
        };

        let mut state = self.lock()?;
        state.next_poll_id = state.next_poll_id.max(poll_id);
        state.polls.insert(poll.poll_id, poll.clone());
        Ok(poll)
    }

    /// Stored counter of a poll
    pub fn votes_count(&self, poll_id: i64) -> Option<i64> {
        self.lock()
            .ok()?
            .polls
            .get(&PollId::new(poll_id))
            .map(|p| p.votes_count)
    }

    /// Number of ledger entries of a poll
    pub fn ledger_len(&self, poll_id: i64) -> usize {
        self.lock()
            .map(|s| {
                s.votes
                    .iter()
                    .filter(|v| v.poll_id == PollId::new(poll_id))
                    .count()
            })
            .unwrap_or(0)
    }

    /// Make the next counter increment fail after the ledger insert,
    /// like a connection dropped mid-transaction
    pub fn fail_next_increment(&self) {
        self.fail_next_increment.store(true, Ordering::SeqCst);
    }

    fn lock(&self) -> VoteResult<MutexGuard<'_, MemoryVoteState>> {
        self.state
            .lock()
            .map_err(|_| VoteError::Internal("vote store lock poisoned".to_string()))
    }
}

impl PollRepository for MemoryVoteRepository {
    async fn find_poll(&self, poll_id: PollId) -> VoteResult<Option<Poll>> {
        Ok(self.lock()?.polls.get(&poll_id).cloned())
    }

    async fn create_poll(&self, poll: &NewPoll) -> VoteResult<Poll> {
        let mut state = self.lock()?;
        state.next_poll_id += 1;

        let created = Poll {
            poll_id: PollId::new(state.next_poll_id),
            title: poll.title.clone(),
            description: poll.description.clone(),
            ticker: poll.ticker.clone(),
            owner_subject_id: Some(poll.owner_subject_id.clone()),
            ballot_alphabet: poll.ballot_alphabet.clone(),
            votes_count: 0,
            created_at: Utc::now(),
        };
        state.polls.insert(created.poll_id, created.clone());

        Ok(created)
    }

    async fn list_polls_by_owner(&self, owner: &SubjectId) -> VoteResult<Vec<Poll>> {
        Ok(self
            .lock()?
            .polls
            .values()
            .rev()
            .filter(|p| p.is_owned_by(owner))
            .cloned()
            .collect())
    }

    async fn delete_poll_owned(&self, poll_id: PollId, owner: &SubjectId) -> VoteResult<bool> {
        let mut state = self.lock()?;
        let owned = state
            .polls
            .get(&poll_id)
            .is_some_and(|p| p.is_owned_by(owner));

        if owned {
            state.polls.remove(&poll_id);
            state.votes.retain(|v| v.poll_id != poll_id);
        }
        Ok(owned)
    }
}

impl VoteRepository for MemoryVoteRepository {
    async fn cast_vote(&self, vote: &NewVote) -> VoteResult<Vote> {
        let mut state = self.lock()?;

        if !state.polls.contains_key(&vote.poll_id) {
            return Err(VoteError::PollNotFound(vote.poll_id));
        }
        let duplicate = state
            .votes
            .iter()
            .any(|v| v.poll_id == vote.poll_id && v.voter_key == vote.voter_key);
        if duplicate {
            return Err(VoteError::DuplicateVote);
        }

        state.next_vote_id += 1;
        let recorded = Vote {
            vote_id: VoteId::new(state.next_vote_id),
            poll_id: vote.poll_id,
            voter_key: vote.voter_key.clone(),
            value: vote.value,
            created_at: Utc::now(),
        };
        state.votes.push(recorded.clone());

        if self.fail_next_increment.swap(false, Ordering::SeqCst) {
            // Roll back the insert
            state.votes.pop();
            return Err(VoteError::Storage(sqlx::Error::Protocol(
                "connection reset during counter update".to_string(),
            )));
        }

        match state.polls.get_mut(&vote.poll_id) {
            Some(poll) => poll.votes_count += 1,
            None => {
                state.votes.pop();
                return Err(VoteError::PollNotFound(vote.poll_id));
            }
        }

        Ok(recorded)
    }

    async fn list_votes_by_poll(&self, poll_id: PollId, limit: i64) -> VoteResult<Vec<Vote>> {
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(self
            .lock()?
            .votes
            .iter()
            .rev()
            .filter(|v| v.poll_id == poll_id)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count_votes_by_poll(&self, poll_id: PollId) -> VoteResult<i64> {
        let count = self
            .lock()?
            .votes
            .iter()
            .filter(|v| v.poll_id == poll_id)
            .count();
        Ok(count as i64)
    }
}
