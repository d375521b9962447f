pub mod category;
#[cfg(feature = "server")]
pub mod config;
pub mod meme;
pub mod profile;
pub mod template;
pub mod user;
