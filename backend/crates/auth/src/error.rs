//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::provider::ProviderError;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Login state nonce missing, expired, mismatched or already used
    #[error("Invalid or expired login state")]
    ForbiddenState,

    /// Authorization code could not be exchanged (network or provider error)
    #[error("Identity provider exchange failed: {0}")]
    ExchangeFailed(String),

    /// Identity token failed verification or lacks a required claim
    #[error("Identity token rejected: {0}")]
    TokenInvalid(String),

    /// No provider registered under this name
    #[error("Unknown identity provider: {0}")]
    UnknownProvider(String),

    /// Session not found, expired or not authenticated
    #[error("Session not found or expired")]
    SessionInvalid,

    /// Authenticated subject has no local user record
    #[error("User not found")]
    UserNotFound,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::ForbiddenState => ErrorKind::Forbidden,
            AuthError::ExchangeFailed(_) => ErrorKind::BadGateway,
            AuthError::TokenInvalid(_) | AuthError::SessionInvalid => ErrorKind::Unauthorized,
            AuthError::UnknownProvider(_) | AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// Upstream and database details stay in the logs.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::ForbiddenState => AppError::new(self.kind(), self.to_string())
                .with_action("Start the login again"),
            AuthError::ExchangeFailed(_) | AuthError::TokenInvalid(_) => {
                AppError::new(self.kind(), "Login with the identity provider failed")
                    .with_action("Start the login again")
            }
            AuthError::Database(_) | AuthError::Internal(_) => {
                AppError::new(self.kind(), "Internal server error")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::ExchangeFailed(reason) => {
                tracing::warn!(reason = %reason, "Identity provider exchange failed");
            }
            AuthError::TokenInvalid(reason) => {
                tracing::warn!(reason = %reason, "Identity token rejected");
            }
            AuthError::ForbiddenState => {
                tracing::warn!("Login callback with invalid state");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<ProviderError> for AuthError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Discovery(_) | ProviderError::Exchange(_) => {
                AuthError::ExchangeFailed(err.to_string())
            }
            ProviderError::Verification(_) | ProviderError::MissingClaim(_) => {
                AuthError::TokenInvalid(err.to_string())
            }
        }
    }
}
