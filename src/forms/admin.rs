use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::category::NewCategory;
use crate::domain::template::NewTemplate;
use crate::domain::types::{
    CategoryId, CategoryName, TemplateImage, TemplateName, TypeConstraintError,
};

#[derive(Deserialize, Validate)]
pub struct CategoryForm {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFormPayload {
    pub name: CategoryName,
}

impl CategoryFormPayload {
    pub fn into_new_category(self) -> NewCategory {
        NewCategory { name: self.name }
    }
}

#[derive(Debug, Error)]
pub enum CategoryFormError {
    #[error("Category form validation failed: {0}")]
    Validation(String),
    #[error("Category form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for CategoryFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for CategoryFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<CategoryForm> for CategoryFormPayload {
    type Error = CategoryFormError;

    fn try_from(value: CategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;

        Ok(Self {
            name: CategoryName::new(value.name)?,
        })
    }
}

/// Template fields of the admin page. An empty `category_id` leaves the
/// template uncategorized.
#[derive(Deserialize, Validate)]
pub struct TemplateForm {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    pub category_id: String,
    #[validate(length(min = 1, max = 100))]
    pub image_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateFormPayload {
    pub name: TemplateName,
    pub category_id: Option<CategoryId>,
    pub image_name: TemplateImage,
}

impl TemplateFormPayload {
    pub fn into_new_template(self) -> NewTemplate {
        NewTemplate {
            name: self.name,
            category_id: self.category_id,
            image_name: self.image_name,
        }
    }
}

#[derive(Debug, Error)]
pub enum TemplateFormError {
    #[error("Template form validation failed: {0}")]
    Validation(String),
    #[error("Template form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for TemplateFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for TemplateFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

fn parse_category_id(raw: &str) -> Result<Option<CategoryId>, TypeConstraintError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let id: i32 = raw
        .parse()
        .map_err(|_| TypeConstraintError::InvalidValue(format!("category id '{raw}'")))?;
    Ok(Some(CategoryId::new(id)?))
}

impl TryFrom<TemplateForm> for TemplateFormPayload {
    type Error = TemplateFormError;

    fn try_from(value: TemplateForm) -> Result<Self, Self::Error> {
        value.validate()?;

        Ok(Self {
            name: TemplateName::new(value.name)?,
            category_id: parse_category_id(&value.category_id)?,
            image_name: TemplateImage::new(value.image_name)?,
        })
    }
}
