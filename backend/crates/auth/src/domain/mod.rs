//! Domain Layer
//!
//! Contains entities, value objects, repository traits and the
//! identity provider port.

pub mod entity;
pub mod provider;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{session::Session, user::User};
pub use provider::{IdentityClaims, IdentityProvider, ProviderError, ProviderRegistry, ProviderToken};
pub use repository::{SessionRepository, UserRepository};
