use serde::{Deserialize, Serialize};

use crate::domain::category::Category;
use crate::domain::template::Template;

/// URL prefix of the bundled template images.
pub const TEMPLATE_IMAGE_URL: &str = "/static/meme_templates/";

/// Date format used by the JSON API.
pub const API_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn template_image_url(image_name: &str) -> String {
    format!("{TEMPLATE_IMAGE_URL}{image_name}")
}

pub fn editor_url(template_id: i32) -> String {
    format!("/memes/editor/{template_id}/")
}

/// `?category=&q=` query of the gallery page and the catalog API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateQuery {
    pub category: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateDto {
    pub id: i32,
    pub name: String,
    pub category_name: Option<String>,
    pub image_url: String,
    pub editor_url: String,
}

impl From<Template> for TemplateDto {
    fn from(value: Template) -> Self {
        let id = value.id.get();
        Self {
            id,
            image_url: template_image_url(&value.image_name),
            editor_url: editor_url(id),
            name: value.name.into_inner(),
            category_name: value.category_name.map(|name| name.into_inner()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateDetailDto {
    pub id: i32,
    pub name: String,
    pub category: Option<String>,
    pub image_url: String,
    pub created_at: String,
}

impl From<Template> for TemplateDetailDto {
    fn from(value: Template) -> Self {
        Self {
            id: value.id.get(),
            image_url: template_image_url(&value.image_name),
            created_at: value.created_at.format(API_DATE_FORMAT).to_string(),
            name: value.name.into_inner(),
            category: value.category_name.map(|name| name.into_inner()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDto {
    pub id: i32,
    pub name: String,
}

impl From<Category> for CategoryDto {
    fn from(value: Category) -> Self {
        Self {
            id: value.id.get(),
            name: value.name.into_inner(),
        }
    }
}

/// Category choice of the gallery filter. The id is the value accepted by
/// `?category=`, which is the category name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryOptionDto {
    pub id: String,
    pub name: String,
}

impl CategoryOptionDto {
    pub fn new(name: &str) -> Self {
        Self {
            id: name.to_string(),
            name: name.to_string(),
        }
    }
}

/// Filtered catalog together with the filter state that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryDto {
    pub templates: Vec<TemplateDto>,
    pub categories: Vec<CategoryOptionDto>,
    pub selected_category: String,
    pub search_query: String,
}

/// Body of `GET /memes/api/templates/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateListResponse {
    pub success: bool,
    pub count: usize,
    pub templates: Vec<TemplateDto>,
    pub categories: Vec<CategoryOptionDto>,
    pub selected_category: String,
    pub search_query: String,
}

impl From<GalleryDto> for TemplateListResponse {
    fn from(value: GalleryDto) -> Self {
        Self {
            success: true,
            count: value.templates.len(),
            templates: value.templates,
            categories: value.categories,
            selected_category: value.selected_category,
            search_query: value.search_query,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorDto {
    pub template: Option<TemplateDto>,
    pub templates: Vec<TemplateDto>,
}
