use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{ImageFormat, MemeName, TemplateId, TypeConstraintError};
use crate::forms::ImageUpload;

/// Separator between the media type and the payload of a data URI.
pub const BASE64_MARKER: &str = ";base64,";

/// JSON body accepted by the save endpoint.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct SaveMemeForm {
    pub image_data: Option<String>,
    #[validate(length(max = 200))]
    pub name: Option<String>,
    #[validate(range(min = 1))]
    pub template_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaveMemeFormPayload {
    pub image: ImageUpload,
    pub name: Option<MemeName>,
    pub template_id: Option<TemplateId>,
}

#[derive(Debug, Error, PartialEq)]
pub enum SaveMemeFormError {
    #[error("Нет данных изображения")]
    MissingImage,
    #[error("Некорректные данные изображения: ожидается data URI в base64")]
    MalformedImage,
    #[error("Не удалось декодировать изображение")]
    InvalidBase64,
    #[error("Save meme form validation failed: {0}")]
    Validation(String),
    #[error("Save meme form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for SaveMemeFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for SaveMemeFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

/// Decodes a `"<mime>;base64,<data>"` payload such as
/// `data:image/png;base64,iVBORw0...`.
pub fn decode_data_uri(value: &str) -> Result<ImageUpload, SaveMemeFormError> {
    let (media_type, body) = value
        .trim()
        .split_once(BASE64_MARKER)
        .ok_or(SaveMemeFormError::MalformedImage)?;

    let (_, subtype) = media_type
        .rsplit_once('/')
        .ok_or(SaveMemeFormError::MalformedImage)?;
    let format = ImageFormat::from_subtype(subtype)?;

    let bytes = STANDARD
        .decode(body.trim())
        .map_err(|_| SaveMemeFormError::InvalidBase64)?;
    if bytes.is_empty() {
        return Err(SaveMemeFormError::MissingImage);
    }

    Ok(ImageUpload { format, bytes })
}

impl TryFrom<SaveMemeForm> for SaveMemeFormPayload {
    type Error = SaveMemeFormError;

    fn try_from(value: SaveMemeForm) -> Result<Self, Self::Error> {
        value.validate()?;

        let image_data = value
            .image_data
            .filter(|data| !data.trim().is_empty())
            .ok_or(SaveMemeFormError::MissingImage)?;

        let name = value
            .name
            .filter(|name| !name.trim().is_empty())
            .map(MemeName::new)
            .transpose()?;

        Ok(Self {
            image: decode_data_uri(&image_data)?,
            name,
            template_id: value.template_id.map(TemplateId::new).transpose()?,
        })
    }
}
