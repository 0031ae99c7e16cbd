//! Value Object Module

pub mod ballot;
pub mod poll_id;
pub mod ticker;
