//! Rutas de autenticación

use axum::{extract::State, routing::post, Json, Router};
use validator::Validate;

use crate::dto::{ApiResponse, LoginRequest, LoginResponse, RegisterRequest};
use crate::models::user::UserProfile;
use crate::services::AuthService;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, AppError> {
    request.validate()?;
    let service = AuthService::new(state.users.clone(), state.jwt.clone());
    let profile = service.register(request).await?;
    Ok(Json(ApiResponse::success_with_message(
        profile,
        "Usuario registrado exitosamente".to_string(),
    )))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    request.validate()?;
    let service = AuthService::new(state.users.clone(), state.jwt.clone());
    let response = service.login(request).await?;
    Ok(Json(response))
}
