//! Helpers for integration tests.

#![allow(dead_code)]

use diesel::prelude::*;
use pushkind_memes::db::{DbPool, establish_connection_pool, run_migrations};
use pushkind_memes::domain::types::{Email, UserId, Username};
use pushkind_memes::domain::user::{NewUser, User};
use pushkind_memes::repository::{DieselRepository, UserWriter};
use tempfile::NamedTempFile;

/// Temporary database used in integration tests.
pub struct TestDb {
    _tempfile: NamedTempFile,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let tempfile = NamedTempFile::new().expect("Failed to create temp file");
        let pool = establish_connection_pool(tempfile.path().to_str().unwrap())
            .expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        run_migrations(&mut conn).expect("Migrations failed");
        TestDb {
            _tempfile: tempfile,
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}

/// Inserts an account with a placeholder password hash.
pub fn create_user(repo: &DieselRepository, username: &str) -> User {
    repo.create_user(&NewUser {
        username: Username::new(username).expect("valid username"),
        email: Email::new("user@example.com").expect("valid email"),
        password_hash: "$argon2id$placeholder".to_string(),
    })
    .expect("should create user")
}

/// Grants catalog administration rights to an account.
pub fn grant_admin(pool: &DbPool, user_id: UserId) {
    use pushkind_memes::schema::users;

    let mut conn = pool.get().expect("Failed to get SQLite connection from pool.");
    diesel::update(users::table.filter(users::id.eq(user_id.get())))
        .set(users::is_admin.eq(true))
        .execute(&mut conn)
        .expect("should grant admin");
}
