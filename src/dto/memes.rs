use serde::Serialize;

use crate::domain::meme::Meme;
use crate::domain::template::Template;
use crate::dto::templates::{API_DATE_FORMAT, template_image_url};
use crate::storage::media_url;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemeDto {
    pub id: i32,
    pub name: String,
    pub template_id: Option<i32>,
    /// Custom image when present, the template image otherwise.
    pub image_url: Option<String>,
    pub is_public: bool,
    pub created_at: String,
}

impl MemeDto {
    pub fn new(meme: Meme, template: Option<&Template>) -> Self {
        let image_url = match (&meme.custom_image, template) {
            (Some(path), _) => Some(media_url(path)),
            (None, Some(template)) => Some(template_image_url(&template.image_name)),
            (None, None) => None,
        };
        Self {
            id: meme.id.get(),
            template_id: meme.template_id.map(|id| id.get()),
            image_url,
            is_public: meme.is_public,
            created_at: meme.created_at.format(API_DATE_FORMAT).to_string(),
            name: meme.name.into_inner(),
        }
    }
}

/// Body of `POST /memes/save/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveMemeResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meme_id: Option<i32>,
}

impl SaveMemeResponse {
    pub fn saved(meme_id: i32) -> Self {
        Self {
            success: true,
            message: Some("Мем успешно сохранён".to_string()),
            error: None,
            meme_id: Some(meme_id),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
            meme_id: None,
        }
    }
}

/// Body of error responses from `POST /memes/delete/{id}/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub message: String,
}

impl StatusResponse {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
        }
    }
}
