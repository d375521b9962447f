use actix_multipart::form::MultipartForm;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::forms::profile::{EditProfileForm, EditProfileFormPayload, ProfileFormValues};
use crate::identity::{LOGIN_URL, login_user};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::profile::{
    show_edit_profile as show_edit_profile_service, show_profile as show_profile_service,
    update_profile as update_profile_service,
};
use crate::storage::FileSystemStorage;

#[get("/memes/profile/")]
pub async fn show_profile(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_profile_service(&user, repo.get_ref()) {
        Ok(page) => {
            let mut context = base_context(&flash_messages, Some(&user), "profile");
            context.insert("profile", &page.profile);
            context.insert("memes", &page.memes);
            render_template(&tera, "memes/profile.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect(LOGIN_URL),
        Err(err) => {
            log::error!("Failed to render profile page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

fn render_edit_form(
    user: &AuthenticatedUser,
    flash_messages: &IncomingFlashMessages,
    values: Option<ProfileFormValues>,
    error: Option<String>,
    repo: &DieselRepository,
    tera: &Tera,
) -> HttpResponse {
    let profile = match show_edit_profile_service(user, repo) {
        Ok(profile) => profile,
        Err(ServiceError::Unauthorized) => return redirect(LOGIN_URL),
        Err(err) => {
            log::error!("Failed to load profile: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let values = values.unwrap_or_else(|| profile.form_values());
    let mut context = base_context(flash_messages, Some(user), "profile");
    context.insert("profile", &profile);
    context.insert("form", &values);
    context.insert("error", &error);
    render_template(tera, "memes/edit_profile.html", &context)
}

#[get("/memes/profile/edit/")]
pub async fn show_edit_profile(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_edit_form(&user, &flash_messages, None, None, repo.get_ref(), &tera)
}

#[post("/memes/profile/edit/")]
pub async fn update_profile(
    req: HttpRequest,
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    storage: web::Data<FileSystemStorage>,
    tera: web::Data<Tera>,
    MultipartForm(form): MultipartForm<EditProfileForm>,
) -> impl Responder {
    let values = form.values();

    let payload = EditProfileFormPayload::try_from(values.clone()).and_then(|mut payload| {
        payload.avatar = form.avatar()?;
        Ok(payload)
    });
    let payload = match payload {
        Ok(payload) => payload,
        Err(e) => {
            return render_edit_form(
                &user,
                &flash_messages,
                Some(values),
                Some(e.to_string()),
                repo.get_ref(),
                &tera,
            );
        }
    };

    match update_profile_service(payload, &user, repo.get_ref(), storage.get_ref()) {
        Ok(identity) => {
            if let Err(e) = login_user(&req, &identity) {
                log::error!("Failed to refresh session identity: {e}");
                return HttpResponse::InternalServerError().finish();
            }
            FlashMessage::success("Профиль обновлён.").send();
            redirect("/memes/profile/")
        }
        Err(ServiceError::Form(message)) | Err(ServiceError::TypeConstraint(message)) => {
            render_edit_form(
                &user,
                &flash_messages,
                Some(values),
                Some(message),
                repo.get_ref(),
                &tera,
            )
        }
        Err(ServiceError::Unauthorized) => redirect(LOGIN_URL),
        Err(err) => {
            log::error!("Failed to update profile: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
