pub mod admin;
pub mod memes;
pub mod profile;
pub mod templates;
