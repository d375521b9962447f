use serde::Serialize;

use crate::domain::profile::Profile;
use crate::domain::user::User;
use crate::dto::memes::MemeDto;
use crate::forms::profile::ProfileFormValues;
use crate::storage::media_url;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileDto {
    pub username: String,
    pub email: String,
    pub bio: String,
    pub avatar_url: Option<String>,
    pub joined_at: String,
}

impl ProfileDto {
    pub fn new(user: &User, profile: Option<&Profile>) -> Self {
        Self {
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            bio: profile
                .map(|p| p.bio.as_str().to_string())
                .unwrap_or_default(),
            avatar_url: profile.and_then(|p| p.avatar.as_ref()).map(media_url),
            joined_at: user.created_at.format("%d.%m.%Y").to_string(),
        }
    }

    /// Current values used to prefill the edit form.
    pub fn form_values(&self) -> ProfileFormValues {
        ProfileFormValues {
            username: Some(self.username.clone()),
            email: Some(self.email.clone()),
            bio: Some(self.bio.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfilePageDto {
    pub profile: ProfileDto,
    pub memes: Vec<MemeDto>,
}
