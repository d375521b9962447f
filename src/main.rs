use std::path::Path;

use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Key, SameSite};
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use actix_web_flash_messages::FlashMessagesFramework;
use actix_web_flash_messages::storage::CookieMessageStore;
use tera::Tera;

use pushkind_memes::db::{establish_connection_pool, run_migrations};
use pushkind_memes::models::config::ServerConfig;
use pushkind_memes::repository::{DieselRepository, TemplateReader};
use pushkind_memes::routes;
use pushkind_memes::storage::FileSystemStorage;

/// Logs every catalog entry whose image is missing from the static directory.
fn check_template_images(repo: &DieselRepository, images_dir: &Path) {
    match repo.list_templates() {
        Ok(templates) => {
            for template in templates {
                let path = images_dir.join(template.image_name.as_str());
                if !path.is_file() {
                    log::warn!(
                        "Image of template {} '{}' not found at {}",
                        template.id.get(),
                        template.name,
                        path.display()
                    );
                }
            }
        }
        Err(e) => log::error!("Failed to list templates: {e}"),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let server_config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load server config: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    match pool.get() {
        Ok(mut conn) => {
            if let Err(e) = run_migrations(&mut conn) {
                log::error!("Failed to run database migrations: {e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            log::error!("Failed to get database connection: {e}");
            std::process::exit(1);
        }
    }

    let secret_key = match Key::try_from(server_config.secret.as_bytes()) {
        Ok(key) => key,
        Err(e) => {
            log::error!("Secret must be at least 64 bytes long: {e}");
            std::process::exit(1);
        }
    };

    let tera = match Tera::new(&format!("{}/**/*", server_config.templates_dir)) {
        Ok(tera) => tera,
        Err(e) => {
            log::error!("Failed to parse templates: {e}");
            std::process::exit(1);
        }
    };

    std::fs::create_dir_all(&server_config.media_dir)?;

    let repo = DieselRepository::new(pool);
    check_template_images(&repo, &server_config.template_images_dir());

    let storage = FileSystemStorage::new(&server_config.media_dir);
    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let address = server_config.address.clone();
    let port = server_config.port;
    log::info!("Starting server at http://{address}:{port}");

    let config = server_config.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(config.secure_cookies)
                    .cookie_same_site(SameSite::Lax)
                    .build(),
            )
            .wrap(Logger::default())
            .app_data(web::JsonConfig::default().limit(config.max_image_size))
            .service(Files::new("/static", &config.static_dir))
            .service(Files::new("/media", &config.media_dir))
            .configure(routes::configure)
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(storage.clone()))
    })
    .bind((address.as_str(), port))?
    .run()
    .await
}
