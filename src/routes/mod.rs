use actix_web::http::header::LOCATION;
use actix_web::{HttpResponse, web};
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::domain::auth::AuthenticatedUser;

pub mod admin;
pub mod api;
pub mod auth;
pub mod main;
pub mod memes;
pub mod profile;

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => {
            log::error!("Failed to render template '{template}': {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, location))
        .finish()
}

pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: Option<&AuthenticatedUser>,
    current_page: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", &user);
    context.insert("current_page", current_page);
    context
}

/// Registers every page and API endpoint of the application.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(main::index)
        .service(memes::show_user_memes)
        .service(memes::show_gallery)
        .service(memes::show_editor)
        .service(memes::show_editor_for_template)
        .service(
            web::resource("/memes/save/")
                .route(web::post().to(memes::save_meme))
                .default_service(web::to(memes::save_meme_method_not_allowed)),
        )
        .service(
            web::resource("/memes/delete/{meme_id}/")
                .route(web::post().to(memes::delete_meme))
                .default_service(web::to(memes::delete_meme_bad_method)),
        )
        .service(profile::show_profile)
        .service(profile::show_edit_profile)
        .service(profile::update_profile)
        .service(auth::show_register)
        .service(auth::register)
        .service(auth::show_login)
        .service(auth::login)
        .service(auth::logout)
        .service(api::api_templates)
        .service(api::api_template)
        .service(admin::show_catalog)
        .service(admin::add_category)
        .service(admin::update_category)
        .service(admin::delete_category)
        .service(admin::add_template)
        .service(admin::update_template)
        .service(admin::delete_template);
}
