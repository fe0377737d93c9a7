//! Rutas de la flota de coches
//!
//! Las consultas son públicas; alta de coches y cambio de estado
//! requieren un token válido.

use axum::{
    extract::{Path, State},
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use validator::Validate;

use crate::dto::{ApiResponse, CarResponse, CreateCarRequest, UpdateCarStatusRequest};
use crate::middleware::auth_middleware;
use crate::models::car::CarStatus;
use crate::services::FleetService;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_car_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(add_car))
        .route("/:number/status", put(update_status))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/available", get(list_available))
        .route("/:number", get(get_car))
        .merge(protected)
}

async fn add_car(
    State(state): State<AppState>,
    Json(request): Json<CreateCarRequest>,
) -> Result<Json<ApiResponse<CarResponse>>, AppError> {
    request.validate()?;
    let fleet = FleetService::new(state.cars.clone());
    let car = fleet.add_car(request).await?;
    Ok(Json(ApiResponse::success_with_message(
        CarResponse::from(car),
        "Coche registrado exitosamente".to_string(),
    )))
}

async fn list_available(
    State(state): State<AppState>,
) -> Result<Json<Vec<CarResponse>>, AppError> {
    let fleet = FleetService::new(state.cars.clone());
    let cars = fleet.list_available().await?;
    Ok(Json(cars.into_iter().map(CarResponse::from).collect()))
}

async fn get_car(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Result<Json<CarResponse>, AppError> {
    let fleet = FleetService::new(state.cars.clone());
    let car = fleet.get_by_number(&number).await?;
    Ok(Json(CarResponse::from(car)))
}

async fn update_status(
    State(state): State<AppState>,
    Path(number): Path<String>,
    Json(request): Json<UpdateCarStatusRequest>,
) -> Result<Json<ApiResponse<CarResponse>>, AppError> {
    request.validate()?;
    let to = CarStatus::parse(&request.status)
        .ok_or_else(|| AppError::Validation(format!("unknown status '{}'", request.status)))?;
    let fleet = FleetService::new(state.cars.clone());
    let car = fleet.set_status(&number, to).await?;
    Ok(Json(ApiResponse::success_with_message(
        CarResponse::from(car),
        "Estado del coche actualizado exitosamente".to_string(),
    )))
}
