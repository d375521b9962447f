use crate::dto::templates::TemplateDto;
use crate::repository::TemplateReader;

use super::{ServiceError, ServiceResult};

/// Number of templates shown on the home page and in the editor picker.
pub const FEATURED_TEMPLATES: usize = 8;

/// Core business logic for rendering the home page.
pub fn show_home<R>(repo: &R) -> ServiceResult<Vec<TemplateDto>>
where
    R: TemplateReader,
{
    featured_templates(repo)
}

pub(crate) fn featured_templates<R>(repo: &R) -> ServiceResult<Vec<TemplateDto>>
where
    R: TemplateReader,
{
    match repo.list_templates() {
        Ok(templates) => Ok(templates
            .into_iter()
            .take(FEATURED_TEMPLATES)
            .map(TemplateDto::from)
            .collect()),
        Err(e) => {
            log::error!("Failed to list templates: {e}");
            Err(ServiceError::Internal)
        }
    }
}
