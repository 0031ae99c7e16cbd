//! Value Object Module

pub mod email;
pub mod provider_name;
pub mod state_nonce;
