use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{MediaPath, MemeId, MemeName, TemplateId, UserId};

/// Display name used when a meme is saved without one.
pub const DEFAULT_MEME_NAME_PREFIX: &str = "Мем #";

/// A meme saved by a user, backed by a template or an uploaded image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meme {
    pub id: MemeId,
    pub user_id: UserId,
    pub template_id: Option<TemplateId>,
    pub custom_image: Option<MediaPath>,
    pub name: MemeName,
    pub is_public: bool,
    pub created_at: NaiveDateTime,
}

/// Data required to insert a new [`Meme`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewMeme {
    pub user_id: UserId,
    pub template_id: Option<TemplateId>,
    pub custom_image: Option<MediaPath>,
    pub name: MemeName,
    pub is_public: bool,
}
