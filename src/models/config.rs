use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Configuration options of the meme service.
///
/// Values are layered from `config/default.yaml`, an optional
/// `config/<APP_ENV>.yaml` and `APP_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
    /// Key material for session and flash cookies, at least 64 bytes.
    pub secret: String,
    pub templates_dir: String,
    pub static_dir: String,
    pub media_dir: String,
    /// Largest accepted JSON body for meme uploads, in bytes.
    pub max_image_size: usize,
    pub secure_cookies: bool,
}

impl ServerConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());

        Config::builder()
            .set_default("address", "127.0.0.1")?
            .set_default("port", 8080)?
            .set_default("database_url", "app.db")?
            .set_default("templates_dir", "templates")?
            .set_default("static_dir", "static")?
            .set_default("media_dir", "media")?
            .set_default("max_image_size", 10 * 1024 * 1024)?
            .set_default("secure_cookies", false)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{app_env}")).required(false))
            .add_source(Environment::with_prefix("APP"))
            .build()?
            .try_deserialize()
    }

    /// Directory holding the template images referenced by the catalog.
    pub fn template_images_dir(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.static_dir).join("meme_templates")
    }
}
