//! Application Layer
//!
//! Use cases and application services.

pub mod complete_login;
pub mod config;
pub mod current_user;
pub mod initiate_login;
pub mod resolve_identity;
pub mod session_token;
pub mod sign_out;

// Re-exports
pub use complete_login::{CompleteLoginInput, CompleteLoginOutput, CompleteLoginUseCase};
pub use config::AuthConfig;
pub use current_user::CurrentUserUseCase;
pub use initiate_login::{InitiateLoginOutput, InitiateLoginUseCase};
pub use resolve_identity::ResolveIdentityUseCase;
pub use session_token::{issue_session_token, parse_session_token};
pub use sign_out::SignOutUseCase;
