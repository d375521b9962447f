use std::collections::HashMap;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::meme::{DEFAULT_MEME_NAME_PREFIX, NewMeme};
use crate::domain::types::{MemeId, MemeName};
use crate::dto::memes::MemeDto;
use crate::forms::memes::SaveMemeFormPayload;
use crate::repository::{MemeReader, MemeWriter, TemplateReader};
use crate::storage::{MEME_DIR, MediaStorage, upload_path};

use super::{ServiceError, ServiceResult, current_user_id};

/// Lists the memes of the current user, newest first.
pub fn show_user_memes<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<Vec<MemeDto>>
where
    R: MemeReader + TemplateReader,
{
    let user_id = current_user_id(user)?;

    let memes = repo.list_memes(user_id).map_err(|e| {
        log::error!("Failed to list memes: {e}");
        ServiceError::Internal
    })?;

    let templates: HashMap<_, _> = repo
        .list_templates()
        .map_err(|e| {
            log::error!("Failed to list templates: {e}");
            ServiceError::Internal
        })?
        .into_iter()
        .map(|t| (t.id, t))
        .collect();

    Ok(memes
        .into_iter()
        .map(|meme| {
            let template = meme.template_id.and_then(|id| templates.get(&id));
            MemeDto::new(meme, template)
        })
        .collect())
}

/// Stores the decoded image and records a new private meme for the current
/// user. The stored asset is removed again when the row cannot be inserted.
pub fn save_meme<R, S>(
    payload: SaveMemeFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
    storage: &S,
) -> ServiceResult<MemeId>
where
    R: MemeReader + MemeWriter + TemplateReader,
    S: MediaStorage,
{
    let user_id = current_user_id(user)?;

    if let Some(template_id) = payload.template_id {
        match repo.get_template_by_id(template_id) {
            Ok(Some(_)) => {}
            Ok(None) => return Err(ServiceError::Form("Шаблон не найден".to_string())),
            Err(e) => {
                log::error!("Failed to get template: {e}");
                return Err(ServiceError::Internal);
            }
        }
    }

    let name = match payload.name {
        Some(name) => name,
        None => {
            let count = repo.count_memes(user_id).map_err(|e| {
                log::error!("Failed to count memes: {e}");
                ServiceError::Internal
            })?;
            MemeName::new(format!("{DEFAULT_MEME_NAME_PREFIX}{}", count + 1))?
        }
    };

    let path = upload_path(MEME_DIR, "meme", user_id, payload.image.format)?;
    if let Err(e) = storage.store(&path, &payload.image.bytes) {
        log::error!("Failed to store meme image {path}: {e}");
        return Err(ServiceError::Internal);
    }

    let new_meme = NewMeme {
        user_id,
        template_id: payload.template_id,
        custom_image: Some(path.clone()),
        name,
        is_public: false,
    };

    match repo.create_meme(&new_meme) {
        Ok(meme) => {
            log::info!("User {} saved meme {}", user_id.get(), meme.id.get());
            Ok(meme.id)
        }
        Err(e) => {
            log::error!("Failed to create meme: {e}");
            if let Err(e) = storage.remove(&path) {
                log::warn!("Failed to remove orphaned meme image {path}: {e}");
            }
            Err(ServiceError::Internal)
        }
    }
}

/// Deletes a meme of the current user. Memes of other users are reported as
/// missing.
pub fn delete_meme<R, S>(
    meme_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
    storage: &S,
) -> ServiceResult<()>
where
    R: MemeReader + MemeWriter,
    S: MediaStorage,
{
    let user_id = current_user_id(user)?;
    let Ok(meme_id) = MemeId::new(meme_id) else {
        return Err(ServiceError::NotFound);
    };

    let meme = match repo.get_meme_by_id(meme_id, user_id) {
        Ok(Some(meme)) => meme,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get meme: {e}");
            return Err(ServiceError::Internal);
        }
    };

    match repo.delete_meme(meme_id, user_id) {
        Ok(0) => return Err(ServiceError::NotFound),
        Ok(_) => {}
        Err(e) => {
            log::error!("Failed to delete meme: {e}");
            return Err(ServiceError::Internal);
        }
    }

    if let Some(path) = meme.custom_image {
        if let Err(e) = storage.remove(&path) {
            log::warn!("Failed to remove meme image {path}: {e}");
        }
    }

    Ok(())
}
