pub mod auth;
pub mod category;
pub mod meme;
pub mod profile;
pub mod template;
pub mod types;
pub mod user;
