use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::profile::Profile as DomainProfile;
use crate::domain::types::{Bio, MediaPath, TypeConstraintError};

/// Diesel model representing the `profiles` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::profiles)]
pub struct Profile {
    pub id: i32,
    pub user_id: i32,
    pub bio: String,
    pub avatar: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Row inserted when a profile does not exist yet.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::profiles)]
pub struct NewProfile {
    pub user_id: i32,
    pub bio: String,
    pub avatar: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Changeset applied when the profile already exists. `None` fields are
/// skipped by Diesel.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::profiles)]
pub struct ProfileChangeset {
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Profile> for DomainProfile {
    type Error = TypeConstraintError;

    fn try_from(profile: Profile) -> Result<Self, Self::Error> {
        Ok(Self {
            id: profile.id.try_into()?,
            user_id: profile.user_id.try_into()?,
            bio: Bio::new(profile.bio)?,
            avatar: profile.avatar.map(MediaPath::new).transpose()?,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        })
    }
}
