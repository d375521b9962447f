use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::{CategoryId, TemplateId};
use crate::dto::admin::{AdminCatalogDto, AdminTemplateDto};
use crate::dto::templates::CategoryDto;
use crate::forms::admin::{CategoryFormPayload, TemplateFormPayload};
use crate::repository::{
    CategoryReader, CategoryWriter, RepositoryError, TemplateReader, TemplateWriter, UserReader,
};

use super::{ServiceError, ServiceResult, current_user_id};

pub const CATEGORY_EXISTS: &str = "Категория с таким названием уже существует.";
pub const UNKNOWN_CATEGORY: &str = "Категория не найдена.";

/// Checks the admin flag of the stored account, not of the session identity.
fn ensure_admin<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: UserReader,
{
    let user_id = current_user_id(user)?;

    match repo.get_user_by_id(user_id) {
        Ok(Some(account)) if account.is_admin => Ok(()),
        Ok(_) => Err(ServiceError::Unauthorized),
        Err(e) => {
            log::error!("Failed to get user: {e}");
            Err(ServiceError::Internal)
        }
    }
}

fn ensure_category_exists<R>(category_id: Option<CategoryId>, repo: &R) -> ServiceResult<()>
where
    R: CategoryReader,
{
    let Some(category_id) = category_id else {
        return Ok(());
    };

    match repo.get_category_by_id(category_id) {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(ServiceError::Form(UNKNOWN_CATEGORY.to_string())),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Categories by name and templates in id order for the admin page.
pub fn show_catalog<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<AdminCatalogDto>
where
    R: UserReader + CategoryReader + TemplateReader,
{
    ensure_admin(user, repo)?;

    let categories = repo.list_categories().map_err(|e| {
        log::error!("Failed to list categories: {e}");
        ServiceError::Internal
    })?;

    let templates = repo.list_templates().map_err(|e| {
        log::error!("Failed to list templates: {e}");
        ServiceError::Internal
    })?;

    Ok(AdminCatalogDto {
        categories: categories.into_iter().map(CategoryDto::from).collect(),
        templates: templates.into_iter().map(AdminTemplateDto::from).collect(),
    })
}

pub fn add_category<R>(
    payload: CategoryFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<bool>
where
    R: UserReader + CategoryWriter,
{
    ensure_admin(user, repo)?;

    match repo.create_category(&payload.into_new_category()) {
        Ok(_) => Ok(true),
        Err(RepositoryError::UniqueViolation(_)) => {
            Err(ServiceError::Form(CATEGORY_EXISTS.to_string()))
        }
        Err(e) => {
            log::error!("Failed to create category: {e}");
            Ok(false)
        }
    }
}

pub fn update_category<R>(
    category_id: i32,
    payload: CategoryFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<bool>
where
    R: UserReader + CategoryWriter,
{
    ensure_admin(user, repo)?;

    let Ok(category_id) = CategoryId::new(category_id) else {
        return Err(ServiceError::NotFound);
    };

    match repo.update_category(category_id, &payload.into_new_category()) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => Ok(true),
        Err(RepositoryError::UniqueViolation(_)) => {
            Err(ServiceError::Form(CATEGORY_EXISTS.to_string()))
        }
        Err(e) => {
            log::error!("Failed to update category: {e}");
            Ok(false)
        }
    }
}

/// Deletes a category. Its templates stay in the catalog without a category.
pub fn delete_category<R>(
    category_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<bool>
where
    R: UserReader + CategoryWriter,
{
    ensure_admin(user, repo)?;

    let Ok(category_id) = CategoryId::new(category_id) else {
        return Err(ServiceError::NotFound);
    };

    match repo.delete_category(category_id) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => Ok(true),
        Err(e) => {
            log::error!("Failed to delete category: {e}");
            Ok(false)
        }
    }
}

pub fn add_template<R>(
    payload: TemplateFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<bool>
where
    R: UserReader + CategoryReader + TemplateWriter,
{
    ensure_admin(user, repo)?;
    ensure_category_exists(payload.category_id, repo)?;

    match repo.create_template(&payload.into_new_template()) {
        Ok(_) => Ok(true),
        Err(e) => {
            log::error!("Failed to create template: {e}");
            Ok(false)
        }
    }
}

pub fn update_template<R>(
    template_id: i32,
    payload: TemplateFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<bool>
where
    R: UserReader + CategoryReader + TemplateWriter,
{
    ensure_admin(user, repo)?;

    let Ok(template_id) = TemplateId::new(template_id) else {
        return Err(ServiceError::NotFound);
    };
    ensure_category_exists(payload.category_id, repo)?;

    match repo.update_template(template_id, &payload.into_new_template()) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => Ok(true),
        Err(e) => {
            log::error!("Failed to update template: {e}");
            Ok(false)
        }
    }
}

/// Deletes a template. Memes made from it keep their stored image.
pub fn delete_template<R>(
    template_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<bool>
where
    R: UserReader + TemplateWriter,
{
    ensure_admin(user, repo)?;

    let Ok(template_id) = TemplateId::new(template_id) else {
        return Err(ServiceError::NotFound);
    };

    match repo.delete_template(template_id) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => Ok(true),
        Err(e) => {
            log::error!("Failed to delete template: {e}");
            Ok(false)
        }
    }
}
