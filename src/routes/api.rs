use actix_web::{HttpResponse, Responder, get, web};
use serde_json::json;

use crate::dto::templates::{TemplateListResponse, TemplateQuery};
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::templates::{show_gallery, show_template};

#[get("/memes/api/templates/")]
pub async fn api_templates(
    params: web::Query<TemplateQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match show_gallery(
        params.category.as_deref(),
        params.q.as_deref(),
        repo.get_ref(),
    ) {
        Ok(gallery) => HttpResponse::Ok().json(TemplateListResponse::from(gallery)),
        Err(err) => {
            log::error!("Failed to list templates: {err}");
            HttpResponse::InternalServerError()
                .json(json!({"success": false, "error": "Внутренняя ошибка сервера"}))
        }
    }
}

#[get("/memes/api/template/{template_id}/")]
pub async fn api_template(
    template_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match show_template(template_id.into_inner(), repo.get_ref()) {
        Ok(template) => HttpResponse::Ok().json(template),
        Err(ServiceError::NotFound) => {
            HttpResponse::NotFound().json(json!({"error": "Шаблон не найден"}))
        }
        Err(err) => {
            log::error!("Failed to get template: {err}");
            HttpResponse::InternalServerError()
                .json(json!({"error": "Внутренняя ошибка сервера"}))
        }
    }
}
