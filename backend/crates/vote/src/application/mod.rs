//! Application Layer
//!
//! Use cases and application services.

pub mod cast_vote;
pub mod config;
pub mod polls;

// Re-exports
pub use cast_vote::CastVoteUseCase;
pub use config::VoteConfig;
pub use polls::{
    CreatePollInput, CreatePollUseCase, DeletePollUseCase, GetPollUseCase, ListOwnPollsUseCase,
    ListVotesUseCase,
};
