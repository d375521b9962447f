use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::meme::{Meme as DomainMeme, NewMeme as DomainNewMeme};
use crate::domain::types::{MediaPath, MemeName, TypeConstraintError};

/// Diesel model representing the `memes` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::memes)]
pub struct Meme {
    pub id: i32,
    pub user_id: i32,
    pub template_id: Option<i32>,
    pub custom_image: Option<String>,
    pub name: String,
    pub is_public: bool,
    pub created_at: NaiveDateTime,
}

/// Insertable form of [`Meme`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::memes)]
pub struct NewMeme {
    pub user_id: i32,
    pub template_id: Option<i32>,
    pub custom_image: Option<String>,
    pub name: String,
    pub is_public: bool,
    pub created_at: NaiveDateTime,
}

impl TryFrom<Meme> for DomainMeme {
    type Error = TypeConstraintError;

    fn try_from(meme: Meme) -> Result<Self, Self::Error> {
        Ok(Self {
            id: meme.id.try_into()?,
            user_id: meme.user_id.try_into()?,
            template_id: meme.template_id.map(TryInto::try_into).transpose()?,
            custom_image: meme.custom_image.map(MediaPath::new).transpose()?,
            name: MemeName::new(meme.name)?,
            is_public: meme.is_public,
            created_at: meme.created_at,
        })
    }
}

impl From<&DomainNewMeme> for NewMeme {
    fn from(meme: &DomainNewMeme) -> Self {
        Self {
            user_id: meme.user_id.get(),
            template_id: meme.template_id.map(|id| id.get()),
            custom_image: meme.custom_image.as_ref().map(|p| p.as_str().to_string()),
            name: meme.name.as_str().to_string(),
            is_public: meme.is_public,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}
