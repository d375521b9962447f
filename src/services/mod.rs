pub mod admin;
pub mod auth;
pub mod errors;
pub mod main;
pub mod memes;
pub mod profile;
pub mod templates;

pub use errors::{ServiceError, ServiceResult};

use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::UserId;

/// Resolves the account id carried by the session identity.
fn current_user_id(user: &AuthenticatedUser) -> ServiceResult<UserId> {
    user.user_id().map_err(|e| {
        log::error!("Invalid user id in session identity: {e}");
        ServiceError::Unauthorized
    })
}
