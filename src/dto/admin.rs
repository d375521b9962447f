use serde::Serialize;

use crate::domain::template::Template;
use crate::dto::templates::{CategoryDto, template_image_url};

/// Template row of the catalog administration page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminTemplateDto {
    pub id: i32,
    pub name: String,
    pub category_id: Option<i32>,
    pub image_name: String,
    pub image_url: String,
}

impl From<Template> for AdminTemplateDto {
    fn from(value: Template) -> Self {
        Self {
            id: value.id.get(),
            image_url: template_image_url(&value.image_name),
            name: value.name.into_inner(),
            category_id: value.category_id.map(|id| id.get()),
            image_name: value.image_name.into_inner(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminCatalogDto {
    pub categories: Vec<CategoryDto>,
    pub templates: Vec<AdminTemplateDto>,
}
