//! Strongly-typed value objects used by domain entities.
//!
//! Domain structs should carry these wrappers instead of raw primitives so that
//! identifiers, text values and file references are validated at the boundary.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;
use validator::ValidateEmail;

/// Maximum number of characters stored for a username.
pub const USERNAME_MAX_LEN: usize = 30;

/// Maximum number of characters accepted for a profile bio.
pub const BIO_MAX_LEN: usize = 500;

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// An identifier was zero or negative.
    #[error("{0} must be greater than zero")]
    NonPositiveId(&'static str),
    /// A string was empty or whitespace-only after trimming.
    #[error("{0} cannot be empty")]
    EmptyString(&'static str),
    /// A string exceeded its maximum length in characters.
    #[error("{0} must be at most {1} characters long")]
    TooLong(&'static str, usize),
    /// A string contained characters outside of its allowed set.
    #[error("{0} contains invalid characters")]
    InvalidCharacters(&'static str),
    /// Email validation failed.
    #[error("email must be a valid address")]
    InvalidEmail,
    /// A file reference was absolute or escaped its storage root.
    #[error("{0} must be a relative path inside the storage root")]
    InvalidPath(&'static str),
    /// The image format is not one of the accepted raster formats.
    #[error("unsupported image format: {0}")]
    UnsupportedImageFormat(String),
    /// Catch-all for custom validation failures.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

fn trim_and_require_non_empty<S: Into<String>>(
    value: S,
    field: &'static str,
) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    if trimmed.is_empty() {
        Err(TypeConstraintError::EmptyString(field))
    } else {
        Ok(trimmed)
    }
}

/// Returns `true` for characters allowed in usernames: Latin and Cyrillic
/// letters (including `ё`), digits, whitespace, dots, hyphens and underscores.
pub fn is_username_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || ('а'..='я').contains(&c)
        || ('А'..='Я').contains(&c)
        || c == 'ё'
        || c == 'Ё'
        || c == '_'
        || c == '.'
        || c == '-'
        || c.is_whitespace()
}

fn is_file_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.'
}

fn validate_file_name(segment: &str, field: &'static str) -> Result<(), TypeConstraintError> {
    if segment.is_empty() || segment == "." || segment == ".." {
        return Err(TypeConstraintError::InvalidPath(field));
    }
    if !segment.chars().all(is_file_name_char) {
        return Err(TypeConstraintError::InvalidCharacters(field));
    }
    Ok(())
}

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        Self::new_for_field(value, "value")
    }

    /// Same as [`Self::new`] but with field-specific error context.
    pub fn new_for_field<S: Into<String>>(
        value: S,
        field: &'static str,
    ) -> Result<Self, TypeConstraintError> {
        trim_and_require_non_empty(value, field).map(Self)
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId($field))
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<i32> for $name {
            fn eq(&self, other: &i32) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<$name> for i32 {
            fn eq(&self, other: &$name) -> bool {
                *self == other.0
            }
        }
    };
}

/// Shared accessors and conversions for string-backed newtypes. The type must
/// provide its own `new` constructor.
macro_rules! string_newtype_impls {
    ($name:ident) => {
        impl $name {
            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                self.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }

        impl PartialEq<$name> for &str {
            fn eq(&self, other: &$name) -> bool {
                *self == other.as_str()
            }
        }
    };
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new_for_field(value, $field)?;
                Ok(Self(inner.into_inner()))
            }
        }

        string_newtype_impls!($name);
    };
}

id_newtype!(CategoryId, "Identifier of a template category.", "category_id");
id_newtype!(TemplateId, "Identifier of a meme template.", "template_id");
id_newtype!(MemeId, "Identifier of a user meme.", "meme_id");
id_newtype!(UserId, "Identifier of a user account.", "user_id");
id_newtype!(ProfileId, "Identifier of a user profile.", "profile_id");

non_empty_string_newtype!(
    CategoryName,
    "Category name enforcing non-empty values.",
    "category name"
);
non_empty_string_newtype!(
    TemplateName,
    "Template name enforcing non-empty values.",
    "template name"
);
non_empty_string_newtype!(
    MemeName,
    "Display name of a meme enforcing non-empty values.",
    "meme name"
);

/// Account name limited to letters, digits, whitespace, dots, hyphens and
/// underscores, at most [`USERNAME_MAX_LEN`] characters.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = trim_and_require_non_empty(value, "username")?;
        if trimmed.chars().count() > USERNAME_MAX_LEN {
            return Err(TypeConstraintError::TooLong("username", USERNAME_MAX_LEN));
        }
        if !trimmed.chars().all(is_username_char) {
            return Err(TypeConstraintError::InvalidCharacters("username"));
        }
        Ok(Self(trimmed))
    }
}

string_newtype_impls!(Username);

/// Syntactically valid email address.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = trim_and_require_non_empty(value, "email")?;
        if !trimmed.as_str().validate_email() {
            return Err(TypeConstraintError::InvalidEmail);
        }
        Ok(Self(trimmed))
    }
}

string_newtype_impls!(Email);

/// Free-form profile text, possibly empty, at most [`BIO_MAX_LEN`] characters.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Bio(String);

impl Bio {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.chars().count() > BIO_MAX_LEN {
            return Err(TypeConstraintError::TooLong("bio", BIO_MAX_LEN));
        }
        Ok(Self(trimmed))
    }
}

string_newtype_impls!(Bio);

/// Bare file name of a template image inside the static template directory.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TemplateImage(String);

impl TemplateImage {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = trim_and_require_non_empty(value, "template image")?;
        validate_file_name(&trimmed, "template image")?;
        Ok(Self(trimmed))
    }
}

string_newtype_impls!(TemplateImage);

/// Path of a stored media asset relative to the media root, e.g.
/// `user_memes/meme_1_1700000000000.png`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct MediaPath(String);

impl MediaPath {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = trim_and_require_non_empty(value, "media path")?;
        for segment in trimmed.split('/') {
            validate_file_name(segment, "media path")?;
        }
        Ok(Self(trimmed))
    }
}

string_newtype_impls!(MediaPath);

/// Raster formats accepted for uploaded memes and avatars.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageFormat {
    /// File extension used when storing assets of this format.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }

    /// Parses a MIME subtype (`png` in `image/png`) or a file extension.
    pub fn from_subtype(value: &str) -> Result<Self, TypeConstraintError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "gif" => Ok(Self::Gif),
            "webp" => Ok(Self::Webp),
            other => Err(TypeConstraintError::UnsupportedImageFormat(
                other.to_string(),
            )),
        }
    }

    /// Derives the format from a file name's extension.
    pub fn from_file_name(file_name: &str) -> Result<Self, TypeConstraintError> {
        match file_name.rsplit_once('.') {
            Some((_, extension)) => Self::from_subtype(extension),
            None => Err(TypeConstraintError::UnsupportedImageFormat(
                file_name.to_string(),
            )),
        }
    }
}

impl Display for ImageFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}
