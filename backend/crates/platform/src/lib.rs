//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (random nonces, SHA-256, HMAC token signing,
//!   constant-time comparison)
//! - Cookie management
//! - Client address extraction

pub mod client;
pub mod cookie;
pub mod crypto;
