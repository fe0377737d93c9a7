//! Rutas HTTP de la API
//!
//! Cada recurso tiene su propio sub-router; aquí se ensambla el router
//! completo con CORS, tracing y el estado compartido.

pub mod auth_routes;
pub mod car_routes;
pub mod rental_routes;

use axum::{routing::get, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::middleware::cors_middleware;
use crate::state::AppState;

/// Ensambla el router completo de la aplicación
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/auth", auth_routes::create_auth_router())
        .nest("/api/cars", car_routes::create_car_router(state.clone()))
        .nest(
            "/api/rentals",
            rental_routes::create_rental_router(state.clone()),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors_middleware())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "car-rental-api"
    }))
}
