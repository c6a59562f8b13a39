//! Session context and role gating.
//!
//! The session record itself is held by the client (the login response is
//! stored browser-side); authenticated requests replay it as headers.
//! The server only trusts the role to decide which lifecycle operations
//! a view may invoke.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header::HeaderMap;
use actix_web::{FromRequest, HttpRequest};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::errors::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const USER_ROLE_HEADER: &str = "x-user-role";
pub const USER_NAME_HEADER: &str = "x-user-name";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Biller,
    KitchenManager,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Biller => "biller",
            UserRole::KitchenManager => "kitchen_manager",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "biller" => Some(UserRole::Biller),
            "kitchen_manager" => Some(UserRole::KitchenManager),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionContext {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub role: UserRole,
    pub full_name: Option<String>,
}

impl SessionContext {
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, AppError> {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        };

        let role = header(USER_ROLE_HEADER)
            .as_deref()
            .and_then(UserRole::parse)
            .ok_or(AppError::Unauthorized)?;
        let user_id = header(USER_ID_HEADER)
            .and_then(|s| Uuid::parse_str(&s).ok())
            .ok_or(AppError::Unauthorized)?;

        Ok(Self {
            user_id,
            email: header(USER_EMAIL_HEADER),
            role,
            full_name: header(USER_NAME_HEADER),
        })
    }

    pub fn require(&self, role: UserRole) -> Result<(), AppError> {
        if self.role == role {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

impl FromRequest for SessionContext {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_headers(req.headers()))
    }
}

/// Credential collaborator: verify an email/password pair and return the
/// session record the client will hold.
pub trait CredentialVerifier: Send + Sync + 'static {
    fn verify(&self, email: &str, password: &str)
        -> Result<Option<SessionContext>, DomainError>;
}
