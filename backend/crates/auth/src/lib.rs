//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits, provider port
//! - `application/` - Use cases and application services
//! - `infra/` - Database and OpenID Connect implementations
//! - `presentation/` - HTTP handlers, DTOs, router, identity middleware
//!
//! ## Features
//! - OAuth 2.0 authorization code login against OIDC providers (Google preset)
//! - Server-side sessions referenced by an HMAC-signed cookie token
//! - Per-request voter identity: the authenticated subject, or a
//!   pseudonymous digest of the client address
//!
//! ## Security Model
//! - Login state is 32 CSPRNG alphanumerics, bound to the session,
//!   compared in constant time and consumed atomically on first use
//! - The state doubles as the OIDC nonce checked inside the ID token
//! - Session lifetime is capped by the ID token expiry

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use domain::provider::{IdentityProvider, ProviderRegistry};
pub use error::{AuthError, AuthResult};
pub use infra::oidc::{OidcProvider, OidcProviderConfig};
pub use infra::postgres::PgAuthRepository;
pub use presentation::middleware::{AuthMiddlewareState, resolve_voter_identity};
pub use presentation::router::{auth_router, auth_router_generic};

#[cfg(any(test, feature = "memory"))]
pub use infra::memory::{MemoryAuthRepository, ScriptedProvider, sample_claims};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
