//! Entity Module

pub mod poll;
pub mod vote;
