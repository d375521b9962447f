use serde::{Deserialize, Serialize};

use crate::domain::types::{TypeConstraintError, UserId};
use crate::domain::user::User;

/// Identity stored in the session cookie after a successful login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub username: String,
}

impl AuthenticatedUser {
    pub fn user_id(&self) -> Result<UserId, TypeConstraintError> {
        UserId::new(self.id)
    }
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.get(),
            username: user.username.as_str().to_string(),
        }
    }
}
