//! Rutas de alquileres
//!
//! Todas requieren usuario autenticado; el user_id sale del token,
//! nunca del body.

use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use validator::Validate;

use crate::dto::{ApiResponse, RentRequest, ReturnRequest};
use crate::middleware::{auth_middleware, AuthUser};
use crate::models::rental::{RentalReceipt, RentalView, ReturnReceipt};
use crate::services::{FleetService, RentalService};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_rental_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(rent_car))
        .route("/return", post(return_car))
        .route("/mine", get(my_rentals))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

fn rental_service(state: &AppState) -> RentalService {
    RentalService::new(FleetService::new(state.cars.clone()), state.rentals.clone())
}

async fn rent_car(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<RentRequest>,
) -> Result<Json<ApiResponse<RentalReceipt>>, AppError> {
    request.validate()?;
    let service = rental_service(&state);
    let receipt = service.rent(user.id, request).await?;
    Ok(Json(ApiResponse::success_with_message(
        receipt,
        "Alquiler creado exitosamente".to_string(),
    )))
}

async fn return_car(
    State(state): State<AppState>,
    Extension(_user): Extension<AuthUser>,
    Json(request): Json<ReturnRequest>,
) -> Result<Json<ApiResponse<ReturnReceipt>>, AppError> {
    request.validate()?;
    let service = rental_service(&state);
    let receipt = service.return_car(&request.car_number).await?;
    Ok(Json(ApiResponse::success_with_message(
        receipt,
        "Coche devuelto exitosamente".to_string(),
    )))
}

async fn my_rentals(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<RentalView>>, AppError> {
    let service = rental_service(&state);
    let rentals = service.rentals_for_user(user.id).await?;
    Ok(Json(rentals))
}
