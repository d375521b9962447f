use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{Email, TypeConstraintError, Username};
use crate::password::validate_password_strength;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password1: String,
    #[validate(length(min = 1))]
    pub password2: String,
}

/// Registration fields echoed back into the form after a failed attempt.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegisterFormValues {
    pub username: String,
    pub email: String,
}

impl RegisterForm {
    pub fn values(&self) -> RegisterFormValues {
        RegisterFormValues {
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegisterFormPayload {
    pub username: Username,
    pub email: Email,
    pub password: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum RegisterFormError {
    #[error("Заполните все поля формы.")]
    Validation(String),
    #[error(
        "Имя пользователя может содержать только буквы, цифры, пробелы, точки, дефисы и подчёркивания (до 30 символов)."
    )]
    InvalidUsername,
    #[error("Введите корректный адрес электронной почты.")]
    InvalidEmail,
    #[error("Пароли не совпадают.")]
    PasswordMismatch,
    #[error("{0}")]
    WeakPassword(String),
}

impl From<ValidationErrors> for RegisterFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl TryFrom<RegisterForm> for RegisterFormPayload {
    type Error = RegisterFormError;

    fn try_from(value: RegisterForm) -> Result<Self, Self::Error> {
        value.validate()?;

        let username =
            Username::new(value.username).map_err(|_| RegisterFormError::InvalidUsername)?;
        let email = Email::new(value.email).map_err(|_| RegisterFormError::InvalidEmail)?;

        if value.password1 != value.password2 {
            return Err(RegisterFormError::PasswordMismatch);
        }
        validate_password_strength(&value.password1, username.as_str())
            .map_err(RegisterFormError::WeakPassword)?;

        Ok(Self {
            username,
            email,
            password: value.password1,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
    pub next: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginFormPayload {
    pub username: Username,
    pub password: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum LoginFormError {
    #[error("Login form validation failed: {0}")]
    Validation(String),
    #[error("Login form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for LoginFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for LoginFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<LoginForm> for LoginFormPayload {
    type Error = LoginFormError;

    fn try_from(value: LoginForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            username: Username::new(value.username)?,
            password: value.password,
        })
    }
}

/// Only same-site relative paths are accepted as post-login redirects.
pub fn safe_next_url(next: Option<&str>) -> &str {
    match next {
        Some(url) if url.starts_with('/') && !url.starts_with("//") => url,
        _ => "/",
    }
}
