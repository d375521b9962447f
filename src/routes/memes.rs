use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::dto::memes::{SaveMemeResponse, StatusResponse};
use crate::dto::templates::TemplateQuery;
use crate::forms::memes::{SaveMemeForm, SaveMemeFormPayload};
use crate::identity::LOGIN_URL;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::memes::{
    delete_meme as delete_meme_service, save_meme as save_meme_service,
    show_user_memes as show_user_memes_service,
};
use crate::services::templates::{
    show_editor as show_editor_service, show_gallery as show_gallery_service,
};
use crate::storage::FileSystemStorage;

#[get("/memes/")]
pub async fn show_user_memes(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_user_memes_service(&user, repo.get_ref()) {
        Ok(memes) => {
            let mut context = base_context(&flash_messages, Some(&user), "memes");
            context.insert("memes", &memes);
            render_template(&tera, "memes/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect(LOGIN_URL),
        Err(err) => {
            log::error!("Failed to render memes page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/memes/gallery/")]
pub async fn show_gallery(
    params: web::Query<TemplateQuery>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_gallery_service(
        params.category.as_deref(),
        params.q.as_deref(),
        repo.get_ref(),
    ) {
        Ok(gallery) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "gallery");
            context.insert("gallery", &gallery);
            render_template(&tera, "memes/gallery.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render gallery: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

fn render_editor(
    template_id: Option<i32>,
    user: &AuthenticatedUser,
    flash_messages: &IncomingFlashMessages,
    repo: &DieselRepository,
    tera: &Tera,
) -> HttpResponse {
    match show_editor_service(template_id, repo) {
        Ok(editor) => {
            let mut context = base_context(flash_messages, Some(user), "editor");
            context.insert("editor", &editor);
            render_template(tera, "memes/editor.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render editor: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/memes/editor/")]
pub async fn show_editor(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_editor(None, &user, &flash_messages, repo.get_ref(), &tera)
}

#[get("/memes/editor/{template_id}/")]
pub async fn show_editor_for_template(
    template_id: web::Path<i32>,
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_editor(
        Some(template_id.into_inner()),
        &user,
        &flash_messages,
        repo.get_ref(),
        &tera,
    )
}

/// `POST /memes/save/`. Answers with JSON in every case, `401` for anonymous
/// callers.
pub async fn save_meme(
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    storage: web::Data<FileSystemStorage>,
    body: Result<web::Json<SaveMemeForm>, actix_web::Error>,
) -> HttpResponse {
    let Some(user) = user else {
        return HttpResponse::Unauthorized().json(SaveMemeResponse::failed("Требуется авторизация"));
    };

    let form = match body {
        Ok(web::Json(form)) => form,
        Err(e) => {
            log::debug!("Rejected meme save body: {e}");
            return HttpResponse::BadRequest().json(SaveMemeResponse::failed("Некорректный JSON"));
        }
    };

    let payload: SaveMemeFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            return HttpResponse::BadRequest().json(SaveMemeResponse::failed(e.to_string()));
        }
    };

    match save_meme_service(payload, &user, repo.get_ref(), storage.get_ref()) {
        Ok(meme_id) => HttpResponse::Ok().json(SaveMemeResponse::saved(meme_id.get())),
        Err(ServiceError::Form(message)) | Err(ServiceError::TypeConstraint(message)) => {
            HttpResponse::BadRequest().json(SaveMemeResponse::failed(message))
        }
        Err(ServiceError::Unauthorized) => {
            HttpResponse::Unauthorized().json(SaveMemeResponse::failed("Требуется авторизация"))
        }
        Err(err) => {
            log::error!("Failed to save meme: {err}");
            HttpResponse::InternalServerError()
                .json(SaveMemeResponse::failed("Внутренняя ошибка сервера"))
        }
    }
}

pub async fn save_meme_method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().json(SaveMemeResponse::failed("Метод не поддерживается"))
}

/// `POST /memes/delete/{meme_id}/`.
pub async fn delete_meme(
    meme_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    storage: web::Data<FileSystemStorage>,
) -> HttpResponse {
    match delete_meme_service(
        meme_id.into_inner(),
        &user,
        repo.get_ref(),
        storage.get_ref(),
    ) {
        Ok(()) => {
            FlashMessage::success("Мем удалён.").send();
            redirect("/memes/")
        }
        Err(ServiceError::NotFound) => {
            HttpResponse::NotFound().json(StatusResponse::error("Мем не найден"))
        }
        Err(ServiceError::Unauthorized) => redirect(LOGIN_URL),
        Err(err) => {
            log::error!("Failed to delete meme: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub async fn delete_meme_bad_method() -> HttpResponse {
    HttpResponse::BadRequest().json(StatusResponse::error("Неверный метод запроса"))
}
