use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryId, CategoryName, TemplateId, TemplateImage, TemplateName};

/// Sentinel value of the category filter meaning "every category".
pub const ALL_CATEGORIES: &str = "all";

/// A reusable base image for meme creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: TemplateId,
    pub name: TemplateName,
    pub category_id: Option<CategoryId>,
    /// Name of the owning category, resolved when the template is loaded.
    pub category_name: Option<CategoryName>,
    pub image_name: TemplateImage,
    pub created_at: NaiveDateTime,
}

/// Data required to insert a new [`Template`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewTemplate {
    pub name: TemplateName,
    pub category_id: Option<CategoryId>,
    pub image_name: TemplateImage,
}

/// Gallery filter: exact category name and case-insensitive name search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateFilter {
    category: Option<String>,
    search: Option<String>,
}

impl TemplateFilter {
    /// Builds a filter from raw query values, taken verbatim. An empty or
    /// `"all"` category and an empty search string disable the respective
    /// criterion.
    pub fn new(category: Option<&str>, search: Option<&str>) -> Self {
        let category = category
            .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
            .map(str::to_string);
        let search = search.filter(|q| !q.is_empty()).map(str::to_lowercase);
        Self { category, search }
    }

    pub fn matches(&self, template: &Template) -> bool {
        if let Some(category) = &self.category {
            match &template.category_name {
                Some(name) if name.as_str() == category => {}
                _ => return false,
            }
        }
        if let Some(search) = &self.search {
            if !template.name.to_lowercase().contains(search.as_str()) {
                return false;
            }
        }
        true
    }

    /// Keeps matching templates, preserving their order.
    pub fn apply(&self, templates: Vec<Template>) -> Vec<Template> {
        templates.into_iter().filter(|t| self.matches(t)).collect()
    }
}
