use crate::domain::auth::AuthenticatedUser;
use crate::domain::user::NewUser;
use crate::forms::auth::{LoginFormPayload, RegisterFormPayload};
use crate::password::{hash_password, verify_password};
use crate::repository::{RepositoryError, UserReader, UserWriter};

use super::{ServiceError, ServiceResult};

pub const USERNAME_EXISTS: &str = "Пользователь с таким именем уже существует.";
pub const INVALID_CREDENTIALS: &str = "Неверное имя пользователя или пароль.";

/// Creates an account and returns the identity to log in with.
pub fn register<R>(payload: RegisterFormPayload, repo: &R) -> ServiceResult<AuthenticatedUser>
where
    R: UserReader + UserWriter,
{
    match repo.get_user_by_username(payload.username.as_str()) {
        Ok(Some(_)) => return Err(ServiceError::Form(USERNAME_EXISTS.to_string())),
        Ok(None) => {}
        Err(e) => {
            log::error!("Failed to look up user: {e}");
            return Err(ServiceError::Internal);
        }
    }

    let password_hash = hash_password(&payload.password).map_err(|e| {
        log::error!("Failed to hash password: {e}");
        ServiceError::Internal
    })?;

    let new_user = NewUser {
        username: payload.username,
        email: payload.email,
        password_hash,
    };

    match repo.create_user(&new_user) {
        Ok(user) => {
            log::info!("Registered user {}", user.id.get());
            Ok(AuthenticatedUser::from(&user))
        }
        Err(RepositoryError::UniqueViolation(_)) => {
            Err(ServiceError::Form(USERNAME_EXISTS.to_string()))
        }
        Err(e) => {
            log::error!("Failed to create user: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Checks credentials. Unknown usernames and wrong passwords produce the same
/// error.
pub fn login<R>(payload: LoginFormPayload, repo: &R) -> ServiceResult<AuthenticatedUser>
where
    R: UserReader,
{
    let user = match repo.get_user_by_username(payload.username.as_str()) {
        Ok(Some(user)) => user,
        Ok(None) => return Err(ServiceError::Form(INVALID_CREDENTIALS.to_string())),
        Err(e) => {
            log::error!("Failed to look up user: {e}");
            return Err(ServiceError::Internal);
        }
    };

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => Ok(AuthenticatedUser::from(&user)),
        Ok(false) => Err(ServiceError::Form(INVALID_CREDENTIALS.to_string())),
        Err(e) => {
            log::error!("Stored password hash for user {} is invalid: {e}", user.id.get());
            Err(ServiceError::Internal)
        }
    }
}
