use crate::domain::auth::AuthenticatedUser;
use crate::domain::user::User;
use crate::dto::profile::{ProfileDto, ProfilePageDto};
use crate::forms::profile::EditProfileFormPayload;
use crate::repository::{
    MemeReader, ProfileReader, ProfileWriter, RepositoryError, TemplateReader, UserReader,
};
use crate::storage::{AVATAR_DIR, MediaStorage, upload_path};

use super::memes::show_user_memes;
use super::{ServiceError, ServiceResult, current_user_id};

pub const USERNAME_TAKEN: &str = "Это имя пользователя уже занято.";

fn load_profile<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<ProfileDto>
where
    R: UserReader + ProfileReader,
{
    let user_id = current_user_id(user)?;

    let account: User = match repo.get_user_by_id(user_id) {
        Ok(Some(account)) => account,
        // The session outlived the account.
        Ok(None) => return Err(ServiceError::Unauthorized),
        Err(e) => {
            log::error!("Failed to get user: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let profile = repo.get_profile(user_id).map_err(|e| {
        log::error!("Failed to get profile: {e}");
        ServiceError::Internal
    })?;

    Ok(ProfileDto::new(&account, profile.as_ref()))
}

/// Profile page data: account details, profile fields and the user's memes.
pub fn show_profile<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<ProfilePageDto>
where
    R: UserReader + ProfileReader + MemeReader + TemplateReader,
{
    Ok(ProfilePageDto {
        profile: load_profile(user, repo)?,
        memes: show_user_memes(user, repo)?,
    })
}

pub fn show_edit_profile<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<ProfileDto>
where
    R: UserReader + ProfileReader,
{
    load_profile(user, repo)
}

/// Applies a validated profile edit and returns the refreshed session
/// identity. A new avatar replaces and removes the previous one.
pub fn update_profile<R, S>(
    payload: EditProfileFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
    storage: &S,
) -> ServiceResult<AuthenticatedUser>
where
    R: ProfileReader + ProfileWriter,
    S: MediaStorage,
{
    let user_id = current_user_id(user)?;

    let previous_avatar = match repo.get_profile(user_id) {
        Ok(profile) => profile.and_then(|p| p.avatar),
        Err(e) => {
            log::error!("Failed to get profile: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let mut payload = payload;
    let new_avatar = match payload.avatar.take() {
        Some(upload) => {
            let path = upload_path(AVATAR_DIR, "avatar", user_id, upload.format)?;
            if let Err(e) = storage.store(&path, &upload.bytes) {
                log::error!("Failed to store avatar {path}: {e}");
                return Err(ServiceError::Internal);
            }
            Some(path)
        }
        None => None,
    };

    let changes = payload.into_changes(new_avatar.clone());
    let result = repo.update_profile(user_id, &changes);

    let (account, _profile) = match result {
        Ok(updated) => updated,
        Err(e) => {
            if let Some(path) = &new_avatar {
                if let Err(e) = storage.remove(path) {
                    log::warn!("Failed to remove unused avatar {path}: {e}");
                }
            }
            return match e {
                RepositoryError::UniqueViolation(_) => {
                    Err(ServiceError::Form(USERNAME_TAKEN.to_string()))
                }
                RepositoryError::NotFound => Err(ServiceError::Unauthorized),
                e => {
                    log::error!("Failed to update profile: {e}");
                    Err(ServiceError::Internal)
                }
            };
        }
    };

    if let (Some(new), Some(old)) = (&new_avatar, &previous_avatar) {
        if new != old {
            if let Err(e) = storage.remove(old) {
                log::warn!("Failed to remove previous avatar {old}: {e}");
            }
        }
    }

    Ok(AuthenticatedUser::from(&account))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profile::Profile;
    use crate::domain::types::{
        Bio, Email, ImageFormat, MediaPath, ProfileId, UserId, Username,
    };
    use crate::forms::ImageUpload;
    use crate::forms::profile::ProfileFormValues;
    use crate::repository::test::TestRepository;
    use crate::storage::test::MemoryStorage;
    use chrono::DateTime;

    fn account(id: i32, username: &str) -> User {
        User {
            id: UserId::new(id).unwrap(),
            username: Username::new(username).unwrap(),
            email: Email::new(format!("{username}@example.com")).unwrap(),
            password_hash: String::new(),
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
            updated_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
            is_admin: false,
        }
    }

    fn session(id: i32, username: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            id,
            username: username.into(),
        }
    }

    fn repo() -> TestRepository {
        TestRepository::new(vec![], vec![account(1, "arnold"), account(2, "elaine")])
    }

    fn form_payload(values: ProfileFormValues) -> Result<EditProfileFormPayload, ServiceError> {
        EditProfileFormPayload::try_from(values).map_err(|e| ServiceError::Form(e.to_string()))
    }

    fn avatar_upload() -> ImageUpload {
        ImageUpload {
            format: ImageFormat::Png,
            bytes: vec![0x89, b'P', b'N', b'G'],
        }
    }

    #[test]
    fn invalid_username_leaves_account_untouched() {
        let repo = repo();
        let storage = MemoryStorage::default();

        let result = form_payload(ProfileFormValues {
            username: Some("ab!".into()),
            bio: Some("changed".into()),
            ..ProfileFormValues::default()
        })
        .and_then(|mut payload| {
            payload.avatar = Some(avatar_upload());
            update_profile(payload, &session(1, "arnold"), &repo, &storage)
        });

        assert!(matches!(result, Err(ServiceError::Form(_))));
        assert_eq!(storage.len(), 0);
        let stored = repo.get_user_by_id(UserId::new(1).unwrap()).unwrap().unwrap();
        assert_eq!(stored.username.as_str(), "arnold");
        assert!(repo.get_profile(UserId::new(1).unwrap()).unwrap().is_none());
    }

    #[test]
    fn back_to_back_avatar_uploads_keep_the_latest_file() {
        let repo = repo();
        let storage = MemoryStorage::default();
        let upload = || EditProfileFormPayload {
            username: None,
            email: None,
            bio: None,
            avatar: Some(avatar_upload()),
        };

        update_profile(upload(), &session(1, "arnold"), &repo, &storage).unwrap();
        let first = repo.get_profile(UserId::new(1).unwrap()).unwrap().unwrap().avatar.unwrap();
        update_profile(upload(), &session(1, "arnold"), &repo, &storage).unwrap();
        let second = repo.get_profile(UserId::new(1).unwrap()).unwrap().unwrap().avatar.unwrap();

        assert_ne!(first, second);
        assert!(!storage.contains(&first));
        assert!(storage.contains(&second));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn long_username_is_truncated() {
        let repo = repo();
        let storage = MemoryStorage::default();
        let long = "a".repeat(35);
        let payload = form_payload(ProfileFormValues {
            username: Some(long),
            ..ProfileFormValues::default()
        })
        .unwrap();

        let identity = update_profile(payload, &session(1, "arnold"), &repo, &storage).unwrap();
        assert_eq!(identity.username, "a".repeat(30));
        assert_eq!(identity.id, 1);
    }

    #[test]
    fn partial_update_creates_profile_and_keeps_other_fields() {
        let repo = repo();
        let storage = MemoryStorage::default();
        let payload = form_payload(ProfileFormValues {
            bio: Some("I'll be back".into()),
            ..ProfileFormValues::default()
        })
        .unwrap();

        update_profile(payload, &session(1, "arnold"), &repo, &storage).unwrap();

        let profile = show_edit_profile(&session(1, "arnold"), &repo).unwrap();
        assert_eq!(profile.username, "arnold");
        assert_eq!(profile.email, "arnold@example.com");
        assert_eq!(profile.bio, "I'll be back");
        assert_eq!(profile.avatar_url, None);
    }

    #[test]
    fn username_collision_is_a_form_error() {
        let repo = repo();
        let storage = MemoryStorage::default();
        let payload = EditProfileFormPayload {
            username: Some(Username::new("elaine").unwrap()),
            email: None,
            bio: None,
            avatar: Some(ImageUpload {
                format: ImageFormat::Png,
                bytes: vec![1, 2, 3],
            }),
        };

        let result = update_profile(payload, &session(1, "arnold"), &repo, &storage);
        assert_eq!(result, Err(ServiceError::Form(USERNAME_TAKEN.to_string())));
        assert_eq!(storage.len(), 0);
    }

    #[test]
    fn new_avatar_replaces_previous_file() {
        let old = MediaPath::new("avatars/avatar_1_1.png").unwrap();
        let repo = repo().with_profiles(vec![Profile {
            id: ProfileId::new(1).unwrap(),
            user_id: UserId::new(1).unwrap(),
            bio: Bio::new("bio").unwrap(),
            avatar: Some(old.clone()),
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
            updated_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
        }]);
        let storage = MemoryStorage::default();
        storage.store(&old, b"old").unwrap();

        let payload = EditProfileFormPayload {
            username: None,
            email: None,
            bio: None,
            avatar: Some(ImageUpload {
                format: ImageFormat::Jpeg,
                bytes: vec![0xff, 0xd8],
            }),
        };
        update_profile(payload, &session(1, "arnold"), &repo, &storage).unwrap();

        assert!(!storage.contains(&old));
        assert_eq!(storage.len(), 1);
        let profile = show_edit_profile(&session(1, "arnold"), &repo).unwrap();
        let url = profile.avatar_url.unwrap();
        assert!(url.starts_with("/media/avatars/avatar_1_"));
        assert!(url.ends_with(".jpg"));
        assert_eq!(profile.bio, "bio");
    }

    #[test]
    fn profile_page_for_deleted_account_is_unauthorized() {
        let repo = repo();
        let result = show_profile(&session(9, "ghost"), &repo);
        assert_eq!(result, Err(ServiceError::Unauthorized));
    }
}
