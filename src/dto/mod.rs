//! DTOs de la API
//!
//! Requests y responses que viajan por HTTP. La validación de entrada vive
//! aquí como derives de `validator`; los handlers llaman a `validate()`
//! antes de tocar los servicios.

pub mod auth_dto;
pub mod car_dto;
pub mod rental_dto;

pub use auth_dto::*;
pub use car_dto::*;
pub use rental_dto::*;

use serde::Serialize;

// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}
