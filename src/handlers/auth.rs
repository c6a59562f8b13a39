use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::CredentialVerifier;
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The session record the client holds and replays as request headers.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub user_id: Uuid,
    pub email: String,
    /// "biller" or "kitchen_manager"
    pub role: String,
    pub full_name: Option<String>,
}

/// POST /auth/login
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = SessionResponse),
        (status = 401, description = "Invalid email or password"),
    ),
    tag = "auth"
)]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let LoginRequest { email, password } = body.into_inner();
    if email.trim().is_empty() || password.is_empty() {
        return Err(AppError::BadRequest("email and password are required".into()));
    }

    let verifier = state.verifier.clone();
    let session = web::block(move || verifier.verify(email.trim(), &password))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    match session {
        Some(session) => Ok(HttpResponse::Ok().json(SessionResponse {
            user_id: session.user_id,
            email: session.email.unwrap_or_default(),
            role: session.role.as_str().to_string(),
            full_name: session.full_name,
        })),
        None => Err(AppError::Unauthorized),
    }
}
