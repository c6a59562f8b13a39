use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Not allowed for this role")]
    Forbidden,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound => AppError::NotFound,
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::DuplicateDraft(_) | DomainError::InvalidTransition { .. } => {
                AppError::Conflict(e.to_string())
            }
            DomainError::Store(msg) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = serde_json::json!({ "error": self.to_string() });
        match self {
            AppError::NotFound => HttpResponse::NotFound().json(body),
            AppError::BadRequest(_) => HttpResponse::BadRequest().json(body),
            AppError::Conflict(_) => HttpResponse::Conflict().json(body),
            AppError::Unauthorized => HttpResponse::Unauthorized().json(body),
            AppError::Forbidden => HttpResponse::Forbidden().json(body),
            AppError::Internal(_) => HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;

    use super::*;
    use crate::domain::bill::BillStatus;

    #[test]
    fn not_found_returns_404() {
        assert_eq!(AppError::NotFound.error_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn bad_request_returns_400() {
        let err = AppError::BadRequest("order number is required".to_string());
        assert_eq!(err.error_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn conflict_returns_409() {
        let err = AppError::Conflict("duplicate".to_string());
        assert_eq!(err.error_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn unauthorized_returns_401_and_forbidden_403() {
        assert_eq!(
            AppError::Unauthorized.error_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::Forbidden.error_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn internal_error_returns_500_without_details() {
        let err = AppError::Internal("connection refused".to_string());
        assert_eq!(
            err.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn duplicate_draft_maps_to_conflict() {
        let app_err: AppError = DomainError::DuplicateDraft("1234".to_string()).into();
        assert!(matches!(app_err, AppError::Conflict(_)));
        assert_eq!(app_err.to_string(), "A draft already exists for order #1234");
    }

    #[test]
    fn invalid_transition_maps_to_conflict() {
        let app_err: AppError = DomainError::InvalidTransition {
            from: BillStatus::Completed,
            action: "complete",
        }
        .into();
        assert!(matches!(app_err, AppError::Conflict(_)));
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let app_err: AppError = DomainError::Validation("empty item list".to_string()).into();
        assert!(matches!(app_err, AppError::BadRequest(_)));
    }

    #[test]
    fn store_error_maps_to_internal() {
        let app_err: AppError = DomainError::Store("oops".to_string()).into();
        assert!(matches!(app_err, AppError::Internal(_)));
    }
}
