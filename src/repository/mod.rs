use crate::db::{DbConnection, DbPool};
use crate::domain::category::{Category, NewCategory};
use crate::domain::meme::{Meme, NewMeme};
use crate::domain::profile::{Profile, ProfileChanges};
use crate::domain::template::{NewTemplate, Template};
use crate::domain::types::{CategoryId, MemeId, TemplateId, UserId};
use crate::domain::user::{NewUser, User};

pub mod category;
pub mod errors;
pub mod meme;
pub mod profile;
pub mod template;
pub mod user;

pub use errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// List all categories ordered by name.
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
}

/// Write operations for category entities.
pub trait CategoryWriter {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category>;
    /// Rename a category; returns the number of updated rows.
    fn update_category(&self, id: CategoryId, category: &NewCategory) -> RepositoryResult<usize>;
    /// Delete a category. Its templates become uncategorized.
    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize>;
}

/// Read-only operations for template entities.
pub trait TemplateReader {
    /// List all templates in id order with their category names resolved.
    fn list_templates(&self) -> RepositoryResult<Vec<Template>>;
    /// Retrieve a template by its identifier.
    fn get_template_by_id(&self, id: TemplateId) -> RepositoryResult<Option<Template>>;
}

/// Write operations for template entities.
pub trait TemplateWriter {
    fn create_template(&self, template: &NewTemplate) -> RepositoryResult<Template>;
    /// Replace every editable field of a template; returns the number of
    /// updated rows.
    fn update_template(&self, id: TemplateId, template: &NewTemplate) -> RepositoryResult<usize>;
    /// Delete a template. Memes made from it keep their image and lose the link.
    fn delete_template(&self, id: TemplateId) -> RepositoryResult<usize>;
}

/// Read-only operations for meme entities. Every query is scoped to an owner.
pub trait MemeReader {
    /// List memes owned by `user_id`, newest first.
    fn list_memes(&self, user_id: UserId) -> RepositoryResult<Vec<Meme>>;
    /// Number of memes owned by `user_id`.
    fn count_memes(&self, user_id: UserId) -> RepositoryResult<usize>;
    /// Retrieve a meme only if it is owned by `user_id`.
    fn get_meme_by_id(&self, id: MemeId, user_id: UserId) -> RepositoryResult<Option<Meme>>;
}

/// Write operations for meme entities.
pub trait MemeWriter {
    /// Persist a new meme and return the stored record.
    fn create_meme(&self, meme: &NewMeme) -> RepositoryResult<Meme>;
    /// Delete a meme owned by `user_id`; returns the number of removed rows.
    fn delete_meme(&self, id: MemeId, user_id: UserId) -> RepositoryResult<usize>;
}

/// Read-only operations for user accounts.
pub trait UserReader {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
    fn get_user_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;
}

/// Write operations for user accounts.
pub trait UserWriter {
    fn create_user(&self, user: &NewUser) -> RepositoryResult<User>;
}

/// Read-only operations for profiles.
pub trait ProfileReader {
    fn get_profile(&self, user_id: UserId) -> RepositoryResult<Option<Profile>>;
}

/// Write operations for profiles.
pub trait ProfileWriter {
    /// Apply account and profile changes in one transaction, creating the
    /// profile row when it does not exist yet.
    fn update_profile(
        &self,
        user_id: UserId,
        changes: &ProfileChanges,
    ) -> RepositoryResult<(User, Profile)>;
}
