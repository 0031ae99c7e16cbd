//! Infrastructure Layer
//!
//! Repository implementations.

#[cfg(any(test, feature = "memory"))]
pub mod memory;
pub mod postgres;

// Re-exports
#[cfg(any(test, feature = "memory"))]
pub use memory::MemoryVoteRepository;
pub use postgres::PgVoteRepository;
