//! Poll Entity

use chrono::{DateTime, Utc};
use kernel::SubjectId;

use crate::domain::value_object::{ballot::BallotAlphabet, poll_id::PollId, ticker::Ticker};
use crate::error::{VoteError, VoteResult};

/// Poll entity
#[derive(Debug, Clone)]
pub struct Poll {
    pub poll_id: PollId,
    pub title: String,
    pub description: Option<String>,
    pub ticker: Ticker,
    /// Creator; cleared when the user is deleted
    pub owner_subject_id: Option<SubjectId>,
    pub ballot_alphabet: BallotAlphabet,
    /// Number of ledger entries for this poll
    pub votes_count: i64,
    pub created_at: DateTime<Utc>,
}

impl Poll {
    pub fn is_owned_by(&self, subject_id: &SubjectId) -> bool {
        self.owner_subject_id.as_ref() == Some(subject_id)
    }
}

/// Validated poll definition, before the database assigns an id
#[derive(Debug, Clone)]
pub struct NewPoll {
    pub title: String,
    pub description: Option<String>,
    pub ticker: Ticker,
    pub owner_subject_id: SubjectId,
    pub ballot_alphabet: BallotAlphabet,
}

impl NewPoll {
    pub fn new(
        owner: SubjectId,
        title: &str,
        description: Option<&str>,
        ticker: &str,
        ballot_alphabet: BallotAlphabet,
        limits: PollLimits,
    ) -> VoteResult<Self> {
        let title = title.trim();
        if title.is_empty() {
            return Err(VoteError::InvalidPoll("title is required".to_string()));
        }
        if title.chars().count() > limits.title_max_length {
            return Err(VoteError::InvalidPoll(format!(
                "title exceeds {} characters",
                limits.title_max_length
            )));
        }

        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        if description
            .as_ref()
            .is_some_and(|d| d.chars().count() > limits.description_max_length)
        {
            return Err(VoteError::InvalidPoll(format!(
                "description exceeds {} characters",
                limits.description_max_length
            )));
        }

        Ok(Self {
            title: title.to_string(),
            description,
            ticker: Ticker::new(ticker)?,
            owner_subject_id: owner,
            ballot_alphabet,
        })
    }
}

/// Length limits applied to new polls
#[derive(Debug, Clone, Copy)]
pub struct PollLimits {
    pub title_max_length: usize,
    pub description_max_length: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMITS: PollLimits = PollLimits {
        title_max_length: 10,
        description_max_length: 20,
    };

    fn owner() -> SubjectId {
        SubjectId::new("sub-1").unwrap()
    }

    #[test]
    fn test_new_poll_trims_and_normalizes() {
        let poll = NewPoll::new(
            owner(),
            "  Moon?  ",
            Some("   "),
            "eth",
            BallotAlphabet::default(),
            LIMITS,
        )
        .unwrap();

        assert_eq!(poll.title, "Moon?");
        assert_eq!(poll.description, None);
        assert_eq!(poll.ticker.as_str(), "ETH");
    }

    #[test]
    fn test_new_poll_rejects_bad_fields() {
        let bad = [
            ("", None, "ETH"),
            ("This title is too long", None, "ETH"),
            ("Ok", Some("a description longer than twenty"), "ETH"),
            ("Ok", None, "ETHEREUM"),
        ];
        for (title, description, ticker) in bad {
            let result = NewPoll::new(
                owner(),
                title,
                description,
                ticker,
                BallotAlphabet::default(),
                LIMITS,
            );
            assert!(matches!(result, Err(VoteError::InvalidPoll(_))));
        }
    }
}
