//! Domain Layer
//!
//! Contains entities, value objects and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{
    poll::{NewPoll, Poll, PollLimits},
    vote::{NewVote, Vote},
};
pub use repository::{PollRepository, VoteRepository};
pub use value_object::{
    ballot::{BallotAlphabet, BallotValue},
    poll_id::{PollId, VoteId},
    ticker::Ticker,
};
