//! Vote Error Types
//!
//! This module provides vote-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::value_object::poll_id::PollId;

/// Vote-specific result type alias
pub type VoteResult<T> = Result<T, VoteError>;

/// Vote-specific error variants
#[derive(Debug, Error)]
pub enum VoteError {
    /// Poll does not exist (or is not owned by the caller, for owner operations)
    #[error("Poll {0} not found")]
    PollNotFound(PollId),

    /// Ballot value is not a single character of the poll's alphabet
    #[error("Invalid vote value: {0}")]
    InvalidValue(String),

    /// Poll definition rejected at creation
    #[error("Invalid poll: {0}")]
    InvalidPoll(String),

    /// This voter already has an entry for this poll
    #[error("Vote already cast for this poll")]
    DuplicateVote,

    /// Operation needs an authenticated identity
    #[error("Authentication required")]
    Unauthenticated,

    /// Storage fault; the transaction was rolled back
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl VoteError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            VoteError::PollNotFound(_) => ErrorKind::NotFound,
            VoteError::InvalidValue(_) | VoteError::InvalidPoll(_) => ErrorKind::BadRequest,
            VoteError::DuplicateVote => ErrorKind::Conflict,
            VoteError::Unauthenticated => ErrorKind::Unauthorized,
            VoteError::Storage(_) | VoteError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            VoteError::DuplicateVote => {
                AppError::new(self.kind(), self.to_string()).with_action("Each voter may vote once")
            }
            VoteError::Unauthenticated => {
                AppError::new(self.kind(), self.to_string()).with_action("Sign in first")
            }
            VoteError::Storage(_) | VoteError::Internal(_) => {
                AppError::new(self.kind(), "Internal server error")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            VoteError::Storage(e) => {
                tracing::error!(error = %e, "Vote storage error");
            }
            VoteError::Internal(msg) => {
                tracing::error!(message = %msg, "Vote internal error");
            }
            VoteError::DuplicateVote => {
                tracing::warn!("Duplicate vote rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Vote error");
            }
        }
    }
}

impl IntoResponse for VoteError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
