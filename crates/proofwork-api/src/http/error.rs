//! Application error type mapping domain error kinds to HTTP status codes.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use proofwork_types::error::{ErrorKind, KudosError, SkillError, SubmissionError, VacancyError};

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    Skill(SkillError),
    Kudos(KudosError),
    Vacancy(VacancyError),
    Submission(SubmissionError),
    /// Missing or unknown API key.
    Unauthorized(String),
    /// Infrastructure failure outside a domain service.
    Internal(String),
}

impl From<SkillError> for AppError {
    fn from(e: SkillError) -> Self {
        AppError::Skill(e)
    }
}

impl From<KudosError> for AppError {
    fn from(e: KudosError) -> Self {
        AppError::Kudos(e)
    }
}

impl From<VacancyError> for AppError {
    fn from(e: VacancyError) -> Self {
        AppError::Vacancy(e)
    }
}

impl From<SubmissionError> for AppError {
    fn from(e: SubmissionError) -> Self {
        AppError::Submission(e)
    }
}

/// HTTP status for a domain error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::InsufficientBalance | ErrorKind::InvalidInitialState => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ErrorKind::IllegalLifecycleTransition | ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::UnrelatedContent => StatusCode::FORBIDDEN,
        ErrorKind::DuplicateSkillReference
        | ErrorKind::UnknownSkillReference
        | ErrorKind::ValidationFailure => StatusCode::BAD_REQUEST,
        ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        let (kind, message) = match self {
            AppError::Skill(e) => (e.kind(), e.to_string()),
            AppError::Kudos(e) => (e.kind(), e.to_string()),
            AppError::Vacancy(e) => (e.kind(), e.to_string()),
            AppError::Submission(e) => (e.kind(), e.to_string()),
            AppError::Unauthorized(msg) => {
                return (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone());
            }
            AppError::Internal(msg) => (ErrorKind::Storage, msg.clone()),
        };
        (status_for(kind), kind.as_str(), message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::error!(code, %message, "request failed");
        } else {
            tracing::debug!(code, %message, status = status.as_u16(), "request rejected");
        }

        let body = ApiResponse::error(code, &message, uuid::Uuid::now_v7().to_string(), 0);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proofwork_types::vacancy::{VacancyId, VacancyStatus};

    #[test]
    fn test_insufficient_balance_is_unprocessable() {
        let err = AppError::from(KudosError::InsufficientBalance {
            balance: 50,
            requested: 80,
        });
        let (status, code, _) = err.parts();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, "INSUFFICIENT_BALANCE");
    }

    #[test]
    fn test_lifecycle_errors_map_to_conflict() {
        let illegal = AppError::from(VacancyError::IllegalLifecycleTransition {
            from: VacancyStatus::Published,
            to: VacancyStatus::Draft,
        });
        assert_eq!(illegal.parts().0, StatusCode::CONFLICT);

        let raced = AppError::from(VacancyError::ConcurrentModification(VacancyId::new()));
        let (status, code, _) = raced.parts();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(code, "CONFLICT");
    }

    #[test]
    fn test_unrelated_content_is_forbidden() {
        let err = AppError::from(SubmissionError::UnrelatedContent("not yours".to_string()));
        assert_eq!(err.parts().0, StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_storage_is_server_error() {
        let err = AppError::from(SkillError::StorageError("disk".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
