//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::models::car::CarStatus;
use crate::store::StoreError;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("car '{0}' not found")]
    CarNotFound(String),

    #[error("car '{0}' is not available for rent")]
    CarNotAvailable(String),

    #[error("car '{0}' already has an active rental")]
    RentalConflict(String),

    #[error("car '{0}' is not currently rented")]
    CarNotRented(String),

    #[error("cannot change car status from {from} to {to}")]
    InvalidTransition { from: CarStatus, to: CarStatus },

    #[error("car number '{0}' is already registered")]
    DuplicateNumber(String),

    #[error("username '{0}' is already taken")]
    DuplicateUsername(String),

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("state inconsistency: {0}")]
    Inconsistency(String),

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    code: String,
}

impl AppError {
    /// Código estable legible por máquina, pensado para clientes y tests
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::InvalidDateRange(_) => "INVALID_DATE_RANGE",
            AppError::CarNotFound(_) => "CAR_NOT_FOUND",
            AppError::CarNotAvailable(_) => "CAR_NOT_AVAILABLE",
            AppError::RentalConflict(_) => "RENTAL_CONFLICT",
            AppError::CarNotRented(_) => "CAR_NOT_RENTED",
            AppError::InvalidTransition { .. } => "INVALID_TRANSITION",
            AppError::DuplicateNumber(_) => "DUPLICATE_CAR_NUMBER",
            AppError::DuplicateUsername(_) => "DUPLICATE_USERNAME",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Inconsistency(_) => "STATE_INCONSISTENCY",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidDateRange(_) => StatusCode::BAD_REQUEST,
            AppError::CarNotFound(_) => StatusCode::NOT_FOUND,
            AppError::CarNotAvailable(_)
            | AppError::RentalConflict(_)
            | AppError::CarNotRented(_)
            | AppError::InvalidTransition { .. }
            | AppError::DuplicateNumber(_)
            | AppError::DuplicateUsername(_) => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Inconsistency(_) | AppError::Storage(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn title(&self) -> &'static str {
        match self.status_code() {
            StatusCode::BAD_REQUEST => "Bad Request",
            StatusCode::NOT_FOUND => "Not Found",
            StatusCode::CONFLICT => "Conflict",
            StatusCode::UNAUTHORIZED => "Unauthorized",
            _ => "Internal Server Error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Los errores 5xx son defectos u operaciones abortadas: siempre al log
        if status.is_server_error() {
            error!("{}: {}", self.code(), self);
        }

        let body = ErrorResponse {
            error: self.title().to_string(),
            message: self.to_string(),
            code: self.code().to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_by_category() {
        assert_eq!(
            AppError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::CarNotFound("KA-01".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::CarNotAvailable("KA-01".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Inconsistency("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_storage_errors_are_not_swallowed() {
        let err = AppError::from(StoreError::Database("connection reset".into()));
        assert_eq!(err.code(), "STORAGE_ERROR");
        assert!(err.to_string().contains("connection reset"));
    }
}
