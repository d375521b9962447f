use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::types::{Email, TypeConstraintError, Username};
use crate::domain::user::{NewUser as DomainNewUser, User as DomainUser};

/// Diesel model representing the `users` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::users)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub is_admin: bool,
}

/// Insertable form of [`User`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Account fields touched by a profile edit.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::users)]
pub struct UserChangeset {
    pub username: Option<String>,
    pub email: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<User> for DomainUser {
    type Error = TypeConstraintError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: user.id.try_into()?,
            username: Username::new(user.username)?,
            email: Email::new(user.email)?,
            password_hash: user.password_hash,
            created_at: user.created_at,
            updated_at: user.updated_at,
            is_admin: user.is_admin,
        })
    }
}

impl From<&DomainNewUser> for NewUser {
    fn from(user: &DomainNewUser) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            password_hash: user.password_hash.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}
