use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{Bio, Email, MediaPath, ProfileId, UserId, Username};

/// Secondary per-user data, created on the first profile edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub user_id: UserId,
    pub bio: Bio,
    pub avatar: Option<MediaPath>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Partial update of a user's account and profile. `None` leaves the stored
/// value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileChanges {
    pub username: Option<Username>,
    pub email: Option<Email>,
    pub bio: Option<Bio>,
    pub avatar: Option<MediaPath>,
}
