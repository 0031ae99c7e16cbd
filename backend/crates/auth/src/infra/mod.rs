//! Infrastructure Layer
//!
//! Database implementations and external service integrations.

#[cfg(any(test, feature = "memory"))]
pub mod memory;
pub mod oidc;
pub mod postgres;

#[cfg(any(test, feature = "memory"))]
pub use memory::{MemoryAuthRepository, ScriptedProvider};
pub use oidc::{OidcProvider, OidcProviderConfig};
pub use postgres::PgAuthRepository;
