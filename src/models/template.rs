use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::template::{NewTemplate as DomainNewTemplate, Template as DomainTemplate};
use crate::domain::types::{CategoryName, TemplateImage, TemplateName, TypeConstraintError};

/// Diesel model representing the `templates` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::templates)]
pub struct Template {
    pub id: i32,
    pub name: String,
    pub category_id: Option<i32>,
    pub image_name: String,
    pub created_at: NaiveDateTime,
}

/// Insertable form of [`Template`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::templates)]
pub struct NewTemplate {
    pub name: String,
    pub category_id: Option<i32>,
    pub image_name: String,
    pub created_at: NaiveDateTime,
}

/// A template row joined with the name of its category.
pub type TemplateWithCategory = (Template, Option<String>);

impl TryFrom<TemplateWithCategory> for DomainTemplate {
    type Error = TypeConstraintError;

    fn try_from((template, category_name): TemplateWithCategory) -> Result<Self, Self::Error> {
        Ok(Self {
            id: template.id.try_into()?,
            name: TemplateName::new(template.name)?,
            category_id: template.category_id.map(TryInto::try_into).transpose()?,
            category_name: category_name.map(CategoryName::new).transpose()?,
            image_name: TemplateImage::new(template.image_name)?,
            created_at: template.created_at,
        })
    }
}

impl From<DomainNewTemplate> for NewTemplate {
    fn from(template: DomainNewTemplate) -> Self {
        Self {
            name: template.name.into_inner(),
            category_id: template.category_id.map(|id| id.get()),
            image_name: template.image_name.into_inner(),
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}
