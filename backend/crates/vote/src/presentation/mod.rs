//! Presentation Layer
//!
//! HTTP handlers, DTOs and router.

pub mod dto;
pub mod handlers;
pub mod router;

// Re-exports
pub use router::{vote_router, vote_router_generic};
