//! Session identity handling.
//!
//! The logged-in account is stored by `actix-identity` as a JSON encoded
//! [`AuthenticatedUser`] and resolved by the extractor below.

use std::future::{Ready, ready};

use actix_identity::{Identity, IdentityExt};
use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::http::header::LOCATION;
use actix_web::{FromRequest, HttpMessage, HttpRequest, HttpResponse, ResponseError};
use thiserror::Error;

use crate::domain::auth::AuthenticatedUser;

pub const LOGIN_URL: &str = "/accounts/login/";

/// Rejection for anonymous requests to guarded pages: a `303` redirect to the
/// login page.
#[derive(Debug, Error)]
#[error("authentication required")]
pub struct AuthenticationRequired {
    next: String,
}

impl ResponseError for AuthenticationRequired {
    fn status_code(&self) -> StatusCode {
        StatusCode::SEE_OTHER
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::SeeOther()
            .insert_header((
                LOCATION,
                format!("{LOGIN_URL}?next={}", urlencoding::encode(&self.next)),
            ))
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to encode identity: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to attach identity: {0}")]
    Login(String),
}

fn identify(req: &HttpRequest) -> Option<AuthenticatedUser> {
    let identity = req.get_identity().ok()?;
    let id = identity.id().ok()?;
    match serde_json::from_str(&id) {
        Ok(user) => Some(user),
        Err(e) => {
            log::warn!("Discarding malformed session identity: {e}");
            None
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AuthenticationRequired;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(identify(req).ok_or_else(|| AuthenticationRequired {
            next: req.path().to_string(),
        }))
    }
}

/// Attaches `user` to the session, replacing any previous identity.
pub fn login_user(req: &HttpRequest, user: &AuthenticatedUser) -> Result<(), SessionError> {
    let encoded = serde_json::to_string(user)?;
    Identity::login(&req.extensions(), encoded).map_err(|e| SessionError::Login(e.to_string()))?;
    Ok(())
}
