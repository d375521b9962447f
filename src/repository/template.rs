use diesel::prelude::*;

use crate::domain::template::{NewTemplate, Template};
use crate::domain::types::TemplateId;
use crate::models::template::{NewTemplate as DbNewTemplate, Template as DbTemplate};
use crate::repository::{
    DieselRepository, RepositoryError, RepositoryResult, TemplateReader, TemplateWriter,
};

impl TemplateReader for DieselRepository {
    fn list_templates(&self) -> RepositoryResult<Vec<Template>> {
        use crate::schema::{categories, templates};

        let mut conn = self.conn()?;

        let items = templates::table
            .left_join(categories::table)
            .select((templates::all_columns, categories::name.nullable()))
            .order(templates::id.asc())
            .load::<(DbTemplate, Option<String>)>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Template>, _>>()?;

        Ok(items)
    }

    fn get_template_by_id(&self, id: TemplateId) -> RepositoryResult<Option<Template>> {
        use crate::schema::{categories, templates};

        let mut conn = self.conn()?;

        let template = templates::table
            .left_join(categories::table)
            .filter(templates::id.eq(id.get()))
            .select((templates::all_columns, categories::name.nullable()))
            .first::<(DbTemplate, Option<String>)>(&mut conn)
            .optional()?;

        Ok(template.map(TryInto::try_into).transpose()?)
    }
}

impl TemplateWriter for DieselRepository {
    fn create_template(&self, template: &NewTemplate) -> RepositoryResult<Template> {
        use crate::schema::templates;

        let created = {
            let mut conn = self.conn()?;
            let db_template: DbNewTemplate = template.clone().into();

            diesel::insert_into(templates::table)
                .values(db_template)
                .get_result::<DbTemplate>(&mut conn)?
        };

        self.get_template_by_id(TemplateId::new(created.id)?)?
            .ok_or(RepositoryError::NotFound)
    }

    fn update_template(&self, id: TemplateId, template: &NewTemplate) -> RepositoryResult<usize> {
        use crate::schema::templates;

        let mut conn = self.conn()?;

        let updated = diesel::update(templates::table.find(id.get()))
            .set((
                templates::name.eq(template.name.as_str()),
                templates::category_id.eq(template.category_id.map(|id| id.get())),
                templates::image_name.eq(template.image_name.as_str()),
            ))
            .execute(&mut conn)?;

        Ok(updated)
    }

    fn delete_template(&self, id: TemplateId) -> RepositoryResult<usize> {
        use crate::schema::templates;

        let mut conn = self.conn()?;

        let deleted = diesel::delete(templates::table.find(id.get())).execute(&mut conn)?;

        Ok(deleted)
    }
}
