use std::collections::BTreeSet;

use crate::domain::template::{ALL_CATEGORIES, TemplateFilter};
use crate::domain::types::TemplateId;
use crate::dto::templates::{
    CategoryOptionDto, EditorDto, GalleryDto, TemplateDetailDto, TemplateDto,
};
use crate::repository::TemplateReader;

use super::main::featured_templates;
use super::{ServiceError, ServiceResult};

/// Lists the catalog filtered by category name and a search query.
///
/// An absent or empty category, as well as the `"all"` sentinel, disables the
/// category filter. The search is a case-insensitive substring match on the
/// template name. Templates are returned in id order. The offered categories
/// are the distinct category names of the whole catalog, sorted; query values
/// are echoed back verbatim.
pub fn show_gallery<R>(
    category: Option<&str>,
    search: Option<&str>,
    repo: &R,
) -> ServiceResult<GalleryDto>
where
    R: TemplateReader,
{
    let catalog = repo.list_templates().map_err(|e| {
        log::error!("Failed to list templates: {e}");
        ServiceError::Internal
    })?;

    let categories = catalog
        .iter()
        .filter_map(|t| t.category_name.as_ref())
        .map(|name| name.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(CategoryOptionDto::new)
        .collect();

    let templates = TemplateFilter::new(category, search).apply(catalog);

    Ok(GalleryDto {
        templates: templates.into_iter().map(TemplateDto::from).collect(),
        categories,
        selected_category: category.unwrap_or(ALL_CATEGORIES).to_string(),
        search_query: search.unwrap_or_default().to_string(),
    })
}

pub fn show_template<R>(template_id: i32, repo: &R) -> ServiceResult<TemplateDetailDto>
where
    R: TemplateReader,
{
    let Ok(template_id) = TemplateId::new(template_id) else {
        return Err(ServiceError::NotFound);
    };

    match repo.get_template_by_id(template_id) {
        Ok(Some(template)) => Ok(TemplateDetailDto::from(template)),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get template: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Data for the editor page. An unknown template id simply opens an empty
/// editor.
pub fn show_editor<R>(template_id: Option<i32>, repo: &R) -> ServiceResult<EditorDto>
where
    R: TemplateReader,
{
    let template = match template_id.map(TemplateId::new) {
        Some(Ok(id)) => match repo.get_template_by_id(id) {
            Ok(template) => template.map(TemplateDto::from),
            Err(e) => {
                log::error!("Failed to get template: {e}");
                return Err(ServiceError::Internal);
            }
        },
        Some(Err(_)) | None => None,
    };

    Ok(EditorDto {
        template,
        templates: featured_templates(repo)?,
    })
}
