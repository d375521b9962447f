use actix_identity::Identity;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::forms::auth::{
    LoginForm, LoginFormPayload, RegisterForm, RegisterFormPayload, RegisterFormValues,
    safe_next_url,
};
use crate::identity::login_user;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::auth::{
    INVALID_CREDENTIALS, login as login_service, register as register_service,
};

fn render_register(
    flash_messages: &IncomingFlashMessages,
    values: &RegisterFormValues,
    error: Option<String>,
    tera: &Tera,
) -> HttpResponse {
    let mut context = base_context(flash_messages, None, "register");
    context.insert("form", values);
    context.insert("error", &error);
    render_template(tera, "auth/register.html", &context)
}

#[get("/memes/register/")]
pub async fn show_register(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if user.is_some() {
        return redirect("/memes/");
    }
    render_register(&flash_messages, &RegisterFormValues::default(), None, &tera)
}

#[post("/memes/register/")]
pub async fn register(
    req: HttpRequest,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<RegisterForm>,
) -> impl Responder {
    let values = form.values();

    let payload: RegisterFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return render_register(&flash_messages, &values, Some(e.to_string()), &tera),
    };

    match register_service(payload, repo.get_ref()) {
        Ok(identity) => {
            if let Err(e) = login_user(&req, &identity) {
                log::error!("Failed to start session for new user: {e}");
                return HttpResponse::InternalServerError().finish();
            }
            FlashMessage::success("Добро пожаловать! Аккаунт создан.").send();
            redirect("/memes/")
        }
        Err(ServiceError::Form(message)) | Err(ServiceError::TypeConstraint(message)) => {
            render_register(&flash_messages, &values, Some(message), &tera)
        }
        Err(err) => {
            log::error!("Failed to register user: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[derive(Debug, Deserialize)]
struct LoginQueryParams {
    next: Option<String>,
}

fn render_login(
    flash_messages: &IncomingFlashMessages,
    username: &str,
    next: &str,
    error: Option<String>,
    tera: &Tera,
) -> HttpResponse {
    let mut context = base_context(flash_messages, None, "login");
    context.insert("username", username);
    context.insert("next", next);
    context.insert("error", &error);
    render_template(tera, "auth/login.html", &context)
}

#[get("/accounts/login/")]
pub async fn show_login(
    params: web::Query<LoginQueryParams>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let next = safe_next_url(params.next.as_deref());
    if user.is_some() {
        return redirect(next);
    }
    render_login(&flash_messages, "", next, None, &tera)
}

#[post("/accounts/login/")]
pub async fn login(
    req: HttpRequest,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    let username = form.username.clone();
    let next = safe_next_url(form.next.as_deref()).to_string();

    let payload: LoginFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(_) => {
            return render_login(
                &flash_messages,
                &username,
                &next,
                Some(INVALID_CREDENTIALS.to_string()),
                &tera,
            );
        }
    };

    match login_service(payload, repo.get_ref()) {
        Ok(identity) => {
            if let Err(e) = login_user(&req, &identity) {
                log::error!("Failed to start session: {e}");
                return HttpResponse::InternalServerError().finish();
            }
            redirect(&next)
        }
        Err(ServiceError::Form(message)) => {
            render_login(&flash_messages, &username, &next, Some(message), &tera)
        }
        Err(err) => {
            log::error!("Failed to log in: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/accounts/logout/")]
pub async fn logout(identity: Option<Identity>) -> impl Responder {
    if let Some(identity) = identity {
        identity.logout();
        FlashMessage::info("Вы вышли из аккаунта.").send();
    }
    redirect("/")
}
