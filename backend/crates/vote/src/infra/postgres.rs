//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::SubjectId;
use kernel::error::conversions::{is_foreign_key_violation, is_unique_violation};
use sqlx::PgPool;

use crate::domain::entity::{
    poll::{NewPoll, Poll},
    vote::{NewVote, Vote},
};
use crate::domain::repository::{PollRepository, VoteRepository};
use crate::domain::value_object::{
    ballot::{BallotAlphabet, BallotValue},
    poll_id::{PollId, VoteId},
    ticker::Ticker,
};
use crate::error::{VoteError, VoteResult};

/// Unique constraint on `votes (poll_id, voter_key)`
pub const VOTES_POLL_VOTER_KEY: &str = "votes_poll_voter_key";

/// PostgreSQL-backed poll store and vote ledger
#[derive(Clone)]
pub struct PgVoteRepository {
    pool: PgPool,
}

impl PgVoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Poll Repository Implementation
// ============================================================================

impl PollRepository for PgVoteRepository {
    async fn find_poll(&self, poll_id: PollId) -> VoteResult<Option<Poll>> {
        let row = sqlx::query_as::<_, PollRow>(
            r#"
            SELECT
                poll_id,
                title,
                description,
                ticker,
                owner_subject_id,
                ballot_alphabet,
                votes_count,
                created_at
            FROM polls
            WHERE poll_id = $1
            "#,
        )
        .bind(poll_id.get())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_poll()).transpose()
    }

    async fn create_poll(&self, poll: &NewPoll) -> VoteResult<Poll> {
        let row = sqlx::query_as::<_, PollRow>(
            r#"
            INSERT INTO polls (
                title,
                description,
                ticker,
                owner_subject_id,
                ballot_alphabet
            ) VALUES ($1, $2, $3, $4, $5)
            RETURNING
                poll_id,
                title,
                description,
                ticker,
                owner_subject_id,
                ballot_alphabet,
                votes_count,
                created_at
            "#,
        )
        .bind(&poll.title)
        .bind(&poll.description)
        .bind(poll.ticker.as_str())
        .bind(poll.owner_subject_id.as_str())
        .bind(poll.ballot_alphabet.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // The owner row must exist; a session can outlive its user.
            if is_foreign_key_violation(&e, None) {
                VoteError::Unauthenticated
            } else {
                VoteError::Storage(e)
            }
        })?;

        row.into_poll()
    }

    async fn list_polls_by_owner(&self, owner: &SubjectId) -> VoteResult<Vec<Poll>> {
        let rows = sqlx::query_as::<_, PollRow>(
            r#"
            SELECT
                poll_id,
                title,
                description,
                ticker,
                owner_subject_id,
                ballot_alphabet,
                votes_count,
                created_at
            FROM polls
            WHERE owner_subject_id = $1
            ORDER BY created_at DESC, poll_id DESC
            "#,
        )
        .bind(owner.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(PollRow::into_poll).collect()
    }

    async fn delete_poll_owned(&self, poll_id: PollId, owner: &SubjectId) -> VoteResult<bool> {
        // Ledger entries go with the poll (ON DELETE CASCADE)
        let deleted = sqlx::query("DELETE FROM polls WHERE poll_id = $1 AND owner_subject_id = $2")
            .bind(poll_id.get())
            .bind(owner.as_str())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted == 1)
    }
}

// ============================================================================
// Vote Repository Implementation
// ============================================================================

impl VoteRepository for PgVoteRepository {
    async fn cast_vote(&self, vote: &NewVote) -> VoteResult<Vote> {
        let mut tx = self.pool.begin().await?;

        // Dropping `tx` on any early return rolls the transaction back.
        let row = sqlx::query_as::<_, VoteRow>(
            r#"
            INSERT INTO votes (poll_id, voter_key, value)
            VALUES ($1, $2, $3)
            RETURNING vote_id, poll_id, voter_key, value, created_at
            "#,
        )
        .bind(vote.poll_id.get())
        .bind(&vote.voter_key)
        .bind(vote.value.to_string())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, Some(VOTES_POLL_VOTER_KEY)) {
                VoteError::DuplicateVote
            } else if is_foreign_key_violation(&e, None) {
                VoteError::PollNotFound(vote.poll_id)
            } else {
                VoteError::Storage(e)
            }
        })?;

        let updated = sqlx::query("UPDATE polls SET votes_count = votes_count + 1 WHERE poll_id = $1")
            .bind(vote.poll_id.get())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if updated != 1 {
            tx.rollback().await?;
            return Err(VoteError::PollNotFound(vote.poll_id));
        }

        tx.commit().await?;

        row.into_vote()
    }

    async fn list_votes_by_poll(&self, poll_id: PollId, limit: i64) -> VoteResult<Vec<Vote>> {
        let rows = sqlx::query_as::<_, VoteRow>(
            r#"
            SELECT vote_id, poll_id, voter_key, value, created_at
            FROM votes
            WHERE poll_id = $1
            ORDER BY created_at DESC, vote_id DESC
            LIMIT $2
            "#,
        )
        .bind(poll_id.get())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(VoteRow::into_vote).collect()
    }

    async fn count_votes_by_poll(&self, poll_id: PollId) -> VoteResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM votes WHERE poll_id = $1")
            .bind(poll_id.get())
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct PollRow {
    poll_id: i64,
    title: String,
    description: Option<String>,
    ticker: String,
    owner_subject_id: Option<String>,
    ballot_alphabet: String,
    votes_count: i64,
    created_at: DateTime<Utc>,
}

impl PollRow {
    fn into_poll(self) -> VoteResult<Poll> {
        let owner_subject_id = self
            .owner_subject_id
            .map(SubjectId::new)
            .transpose()
            .map_err(|e| VoteError::Internal(format!("Invalid owner_subject_id: {}", e)))?;

        Ok(Poll {
            poll_id: PollId::new(self.poll_id),
            title: self.title,
            description: self.description,
            ticker: Ticker::from_db(self.ticker),
            owner_subject_id,
            ballot_alphabet: BallotAlphabet::from_db(self.ballot_alphabet),
            votes_count: self.votes_count,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct VoteRow {
    vote_id: i64,
    poll_id: i64,
    voter_key: String,
    value: String,
    created_at: DateTime<Utc>,
}

impl VoteRow {
    fn into_vote(self) -> VoteResult<Vote> {
        Ok(Vote {
            vote_id: VoteId::new(self.vote_id),
            poll_id: PollId::new(self.poll_id),
            voter_key: self.voter_key,
            value: BallotValue::from_db(&self.value)?,
            created_at: self.created_at,
        })
    }
}
