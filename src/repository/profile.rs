use diesel::prelude::*;

use crate::domain::profile::{Profile, ProfileChanges};
use crate::domain::types::UserId;
use crate::domain::user::User;
use crate::models::profile::{NewProfile, Profile as DbProfile, ProfileChangeset};
use crate::models::user::{User as DbUser, UserChangeset};
use crate::repository::{
    DieselRepository, ProfileReader, ProfileWriter, RepositoryError, RepositoryResult,
};

impl ProfileReader for DieselRepository {
    fn get_profile(&self, user_id: UserId) -> RepositoryResult<Option<Profile>> {
        use crate::schema::profiles;

        let mut conn = self.conn()?;

        let profile = profiles::table
            .filter(profiles::user_id.eq(user_id.get()))
            .first::<DbProfile>(&mut conn)
            .optional()?;

        Ok(profile.map(TryInto::try_into).transpose()?)
    }
}

impl ProfileWriter for DieselRepository {
    fn update_profile(
        &self,
        user_id: UserId,
        changes: &ProfileChanges,
    ) -> RepositoryResult<(User, Profile)> {
        use crate::schema::{profiles, users};

        let mut conn = self.conn()?;
        let now = chrono::Utc::now().naive_utc();

        let (user, profile) = conn.transaction::<_, RepositoryError, _>(|conn| {
            let user = diesel::update(users::table.filter(users::id.eq(user_id.get())))
                .set(UserChangeset {
                    username: changes.username.as_ref().map(|u| u.as_str().to_string()),
                    email: changes.email.as_ref().map(|e| e.as_str().to_string()),
                    updated_at: now,
                })
                .get_result::<DbUser>(conn)?;

            let bio = changes.bio.as_ref().map(|b| b.as_str().to_string());
            let avatar = changes.avatar.as_ref().map(|a| a.as_str().to_string());

            diesel::insert_into(profiles::table)
                .values(NewProfile {
                    user_id: user_id.get(),
                    bio: bio.clone().unwrap_or_default(),
                    avatar: avatar.clone(),
                    created_at: now,
                    updated_at: now,
                })
                .on_conflict(profiles::user_id)
                .do_update()
                .set(ProfileChangeset {
                    bio,
                    avatar,
                    updated_at: now,
                })
                .execute(conn)?;

            let profile = profiles::table
                .filter(profiles::user_id.eq(user_id.get()))
                .first::<DbProfile>(conn)?;

            Ok((user, profile))
        })?;

        Ok((user.try_into()?, profile.try_into()?))
    }
}
