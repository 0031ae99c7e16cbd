//! Current User Use Case
//!
//! Profile of the authenticated caller.

use kernel::VoterIdentity;
use std::sync::Arc;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

/// Current user use case
pub struct CurrentUserUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> CurrentUserUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, identity: &VoterIdentity) -> AuthResult<User> {
        let subject = identity.subject().ok_or(AuthError::SessionInvalid)?;

        self.user_repo
            .find_by_subject(subject)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}
