//! Vote Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Polls, ledger entries, ballot values, repository traits
//! - `application/` - Use cases
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Integrity Model
//! - One ledger entry per (poll, voter key), enforced by a database
//!   unique constraint rather than an in-process lock
//! - The ledger insert and the poll counter increment commit together,
//!   so `votes_count` always equals the number of entries
//! - The voter key is the authenticated subject or the pseudonymous
//!   address digest, resolved upstream and read from request extensions

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::VoteConfig;
pub use error::{VoteError, VoteResult};
pub use infra::postgres::PgVoteRepository;
pub use presentation::router::{vote_router, vote_router_generic};

#[cfg(any(test, feature = "memory"))]
pub use infra::memory::MemoryVoteRepository;

#[cfg(test)]
mod tests;
