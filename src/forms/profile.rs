use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::profile::ProfileChanges;
use crate::domain::types::{
    Bio, Email, ImageFormat, TypeConstraintError, USERNAME_MAX_LEN, Username, is_username_char,
};
use crate::forms::ImageUpload;

#[derive(MultipartForm)]
pub struct EditProfileForm {
    pub username: Option<Text<String>>,
    pub email: Option<Text<String>>,
    pub bio: Option<Text<String>>,
    #[multipart(limit = "5MB")]
    pub avatar: Option<TempFile>,
}

/// Text fields of the profile form, kept verbatim for re-display after a
/// failed submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProfileFormValues {
    pub username: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditProfileFormPayload {
    pub username: Option<Username>,
    pub email: Option<Email>,
    pub bio: Option<Bio>,
    pub avatar: Option<ImageUpload>,
}

#[derive(Debug, Error, PartialEq)]
pub enum ProfileFormError {
    #[error(
        "Имя пользователя может содержать только буквы, цифры, пробелы, точки, дефисы и подчёркивания."
    )]
    InvalidUsername,
    #[error("Введите корректный адрес электронной почты.")]
    InvalidEmail,
    #[error("Поле «О себе» не может быть длиннее 500 символов.")]
    BioTooLong,
    #[error("Аватар должен быть изображением PNG, JPEG, GIF или WebP.")]
    InvalidAvatar,
    #[error("Не удалось прочитать загруженный файл.")]
    AvatarReadFailed,
    #[error("Profile form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<TypeConstraintError> for ProfileFormError {
    fn from(value: TypeConstraintError) -> Self {
        match value {
            TypeConstraintError::InvalidEmail => Self::InvalidEmail,
            TypeConstraintError::TooLong("bio", _) => Self::BioTooLong,
            TypeConstraintError::UnsupportedImageFormat(_) => Self::InvalidAvatar,
            other => Self::TypeConstraint(other.to_string()),
        }
    }
}

/// Validates a username submitted on the profile page. The accepted value is
/// HTML-escaped and cut to [`USERNAME_MAX_LEN`] characters.
pub fn sanitize_username(raw: &str) -> Result<Username, ProfileFormError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.chars().all(is_username_char) {
        return Err(ProfileFormError::InvalidUsername);
    }

    let escaped = tera::escape_html(trimmed);
    let truncated: String = escaped.chars().take(USERNAME_MAX_LEN).collect();
    Username::new(truncated).map_err(|_| ProfileFormError::InvalidUsername)
}

impl EditProfileForm {
    pub fn values(&self) -> ProfileFormValues {
        ProfileFormValues {
            username: self.username.as_ref().map(|v| v.0.clone()),
            email: self.email.as_ref().map(|v| v.0.clone()),
            bio: self.bio.as_ref().map(|v| v.0.clone()),
        }
    }

    /// Reads the uploaded avatar. An empty file input counts as no upload.
    pub fn avatar(&self) -> Result<Option<ImageUpload>, ProfileFormError> {
        let Some(file) = self.avatar.as_ref() else {
            return Ok(None);
        };
        let Some(file_name) = file.file_name.as_deref().filter(|name| !name.is_empty()) else {
            return Ok(None);
        };
        if file.size == 0 {
            return Ok(None);
        }

        if let Some(content_type) = file.content_type.as_ref() {
            if content_type.type_() != "image" {
                return Err(ProfileFormError::InvalidAvatar);
            }
        }
        let format = ImageFormat::from_file_name(file_name)?;

        let bytes =
            std::fs::read(file.file.path()).map_err(|_| ProfileFormError::AvatarReadFailed)?;

        Ok(Some(ImageUpload { format, bytes }))
    }
}

impl TryFrom<ProfileFormValues> for EditProfileFormPayload {
    type Error = ProfileFormError;

    fn try_from(value: ProfileFormValues) -> Result<Self, Self::Error> {
        let username = value
            .username
            .as_deref()
            .map(sanitize_username)
            .transpose()?;

        let email = value
            .email
            .filter(|email| !email.trim().is_empty())
            .map(Email::new)
            .transpose()?;

        let bio = value.bio.map(Bio::new).transpose()?;

        Ok(Self {
            username,
            email,
            bio,
            avatar: None,
        })
    }
}

impl EditProfileFormPayload {
    /// Converts the payload into repository changes once the avatar, if any,
    /// has been stored.
    pub fn into_changes(self, avatar: Option<crate::domain::types::MediaPath>) -> ProfileChanges {
        ProfileChanges {
            username: self.username,
            email: self.email,
            bio: self.bio,
            avatar,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_disallowed_username_characters() {
        assert_eq!(
            sanitize_username("ab!").unwrap_err(),
            ProfileFormError::InvalidUsername
        );
        assert_eq!(
            sanitize_username("   ").unwrap_err(),
            ProfileFormError::InvalidUsername
        );
    }

    #[test]
    fn truncates_long_usernames() {
        let raw = "abcdefghij".repeat(3) + "klmno";
        assert_eq!(raw.chars().count(), 35);
        let username = sanitize_username(&raw).unwrap();
        assert_eq!(username.as_str(), "abcdefghij".repeat(3));
    }

    #[test]
    fn absent_fields_stay_absent() {
        let payload = EditProfileFormPayload::try_from(ProfileFormValues::default()).unwrap();
        assert_eq!(payload.username, None);
        assert_eq!(payload.email, None);
        assert_eq!(payload.bio, None);
    }

    #[test]
    fn empty_email_is_ignored_and_invalid_email_rejected() {
        let payload = EditProfileFormPayload::try_from(ProfileFormValues {
            email: Some(String::new()),
            ..ProfileFormValues::default()
        })
        .unwrap();
        assert_eq!(payload.email, None);

        let err = EditProfileFormPayload::try_from(ProfileFormValues {
            email: Some("nope".into()),
            ..ProfileFormValues::default()
        })
        .unwrap_err();
        assert_eq!(err, ProfileFormError::InvalidEmail);
    }

    #[test]
    fn overlong_bio_is_rejected() {
        let err = EditProfileFormPayload::try_from(ProfileFormValues {
            bio: Some("я".repeat(501)),
            ..ProfileFormValues::default()
        })
        .unwrap_err();
        assert_eq!(err, ProfileFormError::BioTooLong);
    }

    #[test]
    fn present_empty_bio_clears_it() {
        let payload = EditProfileFormPayload::try_from(ProfileFormValues {
            bio: Some("  ".into()),
            ..ProfileFormValues::default()
        })
        .unwrap();
        assert_eq!(payload.bio.unwrap().as_str(), "");
    }
}
