use crate::domain::types::ImageFormat;

pub mod admin;
pub mod auth;
pub mod memes;
pub mod profile;

/// Decoded image submitted by a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
}
