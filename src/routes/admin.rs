use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::forms::admin::{
    CategoryForm, CategoryFormPayload, TemplateForm, TemplateFormPayload,
};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, ServiceResult};
use crate::services::admin::{
    add_category as add_category_service, add_template as add_template_service,
    delete_category as delete_category_service, delete_template as delete_template_service,
    show_catalog as show_catalog_service, update_category as update_category_service,
    update_template as update_template_service,
};

const ADMIN_URL: &str = "/admin/";
const FORBIDDEN: &str = "Недостаточно прав для управления каталогом.";

/// Turns the outcome of a catalog change into a flash message and a redirect
/// back to the admin page.
fn finish(
    result: ServiceResult<bool>,
    success: &str,
    failure: &str,
    missing: &str,
) -> HttpResponse {
    match result {
        Ok(true) => FlashMessage::success(success).send(),
        Ok(false) => FlashMessage::error(failure).send(),
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(FORBIDDEN).send();
            return redirect("/");
        }
        Err(ServiceError::NotFound) => FlashMessage::error(missing).send(),
        Err(ServiceError::Form(message)) | Err(ServiceError::TypeConstraint(message)) => {
            FlashMessage::error(message).send()
        }
        Err(ServiceError::Internal) => return HttpResponse::InternalServerError().finish(),
    }

    redirect(ADMIN_URL)
}

#[get("/admin/")]
pub async fn show_catalog(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_catalog_service(&user, repo.get_ref()) {
        Ok(catalog) => {
            let mut context = base_context(&flash_messages, Some(&user), "admin");
            context.insert("catalog", &catalog);
            render_template(&tera, "admin/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(FORBIDDEN).send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to render admin page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/categories/")]
pub async fn add_category(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<CategoryForm>,
) -> impl Responder {
    let payload: CategoryFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(ADMIN_URL);
        }
    };

    finish(
        add_category_service(payload, &user, repo.get_ref()),
        "Категория добавлена.",
        "Ошибка при добавлении категории.",
        "Категория не найдена.",
    )
}

#[post("/admin/categories/{category_id}/update")]
pub async fn update_category(
    category_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<CategoryForm>,
) -> impl Responder {
    let payload: CategoryFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(ADMIN_URL);
        }
    };

    finish(
        update_category_service(category_id.into_inner(), payload, &user, repo.get_ref()),
        "Категория обновлена.",
        "Ошибка при обновлении категории.",
        "Категория не найдена.",
    )
}

#[post("/admin/categories/{category_id}/delete")]
pub async fn delete_category(
    category_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    finish(
        delete_category_service(category_id.into_inner(), &user, repo.get_ref()),
        "Категория удалена.",
        "Ошибка при удалении категории.",
        "Категория не найдена.",
    )
}

#[post("/admin/templates/")]
pub async fn add_template(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<TemplateForm>,
) -> impl Responder {
    let payload: TemplateFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(ADMIN_URL);
        }
    };

    finish(
        add_template_service(payload, &user, repo.get_ref()),
        "Шаблон добавлен.",
        "Ошибка при добавлении шаблона.",
        "Шаблон не найден.",
    )
}

#[post("/admin/templates/{template_id}/update")]
pub async fn update_template(
    template_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<TemplateForm>,
) -> impl Responder {
    let payload: TemplateFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(ADMIN_URL);
        }
    };

    finish(
        update_template_service(template_id.into_inner(), payload, &user, repo.get_ref()),
        "Шаблон обновлён.",
        "Ошибка при обновлении шаблона.",
        "Шаблон не найден.",
    )
}

#[post("/admin/templates/{template_id}/delete")]
pub async fn delete_template(
    template_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    finish(
        delete_template_service(template_id.into_inner(), &user, repo.get_ref()),
        "Шаблон удалён.",
        "Ошибка при удалении шаблона.",
        "Шаблон не найден.",
    )
}
