//! Registro de flota
//!
//! Inventario de coches y transiciones de estado. Todas las mutaciones de
//! estado pasan por `transition`, que comprueba la legalidad del cambio y
//! delega el compare-and-set al store; así dos peticiones concurrentes
//! nunca aplican la misma transición dos veces.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::dto::car_dto::CreateCarRequest;
use crate::models::car::{Car, CarCategory, CarStatus};
use crate::store::{CarStore, CARS_NUMBER_KEY};
use crate::utils::errors::{AppError, AppResult};

/// Servicio de inventario de coches
#[derive(Clone)]
pub struct FleetService {
    cars: Arc<dyn CarStore>,
}

impl FleetService {
    pub fn new(cars: Arc<dyn CarStore>) -> Self {
        Self { cars }
    }

    /// Registra un coche nuevo; el número debe ser único en la flota
    pub async fn add_car(&self, request: CreateCarRequest) -> AppResult<Car> {
        let car = Car::new(
            request.number,
            CarCategory::parse(&request.category),
            request.name,
        );

        match self.cars.create(&car).await {
            Ok(()) => {
                info!("🚗 Coche {} registrado ({})", car.number, car.category);
                Ok(car)
            }
            Err(err) if err.is_unique_violation(CARS_NUMBER_KEY) => {
                Err(AppError::DuplicateNumber(car.number))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Busca por número de negocio; error si no existe
    pub async fn get_by_number(&self, number: &str) -> AppResult<Car> {
        self.cars
            .get_by_number(number)
            .await?
            .ok_or_else(|| AppError::CarNotFound(number.to_string()))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Car> {
        self.cars
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::CarNotFound(id.to_string()))
    }

    pub async fn list_all(&self) -> AppResult<Vec<Car>> {
        Ok(self.cars.list().await?)
    }

    /// Coches disponibles para alquilar
    pub async fn list_available(&self) -> AppResult<Vec<Car>> {
        Ok(self.cars.list_by_status(CarStatus::Available).await?)
    }

    /// Transición de estado con compare-and-set. Rechaza pares ilegales
    /// con `InvalidTransition`. Si el CAS no aplica, relee el coche y
    /// devuelve `InvalidTransition` con el estado real (carrera perdida)
    /// o `CarNotFound` si el id no existe; nunca pisa un estado ajeno.
    pub async fn transition(&self, id: Uuid, from: CarStatus, to: CarStatus) -> AppResult<()> {
        if !from.can_transition_to(to) {
            return Err(AppError::InvalidTransition { from, to });
        }
        if self.cars.transition(id, from, to).await? {
            return Ok(());
        }
        match self.cars.get_by_id(id).await? {
            Some(car) => Err(AppError::InvalidTransition {
                from: car.status,
                to,
            }),
            None => Err(AppError::CarNotFound(id.to_string())),
        }
    }

    /// Cambio de estado administrativo. Solo cubre el ciclo de
    /// mantenimiento; alquilar y devolver tienen sus propias operaciones.
    pub async fn set_status(&self, number: &str, to: CarStatus) -> AppResult<Car> {
        let car = self.get_by_number(number).await?;

        let admin_pair = matches!(
            (car.status, to),
            (CarStatus::Available, CarStatus::Maintenance)
                | (CarStatus::Maintenance, CarStatus::Available)
        );
        if !admin_pair {
            return Err(AppError::InvalidTransition {
                from: car.status,
                to,
            });
        }

        self.transition(car.id, car.status, to).await?;

        info!("🔧 Coche {} ahora en estado {}", car.number, to);
        Ok(Car { status: to, ..car })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn fleet() -> FleetService {
        FleetService::new(Arc::new(MemoryStore::new()))
    }

    fn create_request(number: &str, category: &str) -> CreateCarRequest {
        CreateCarRequest {
            number: number.to_string(),
            category: category.to_string(),
            name: format!("Car {}", number),
        }
    }

    #[tokio::test]
    async fn test_add_car_starts_available() {
        let fleet = fleet();
        let car = fleet.add_car(create_request("KA-01", "sedan")).await.unwrap();

        assert_eq!(car.status, CarStatus::Available);
        assert_eq!(car.category, CarCategory::Sedan);
        assert_eq!(fleet.list_available().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_number_is_rejected() {
        let fleet = fleet();
        fleet.add_car(create_request("KA-01", "sedan")).await.unwrap();

        let err = fleet
            .add_car(create_request("KA-01", "suv"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateNumber(n) if n == "KA-01"));
    }

    #[tokio::test]
    async fn test_maintenance_cycle() {
        let fleet = fleet();
        fleet.add_car(create_request("KA-01", "mini")).await.unwrap();

        let car = fleet
            .set_status("KA-01", CarStatus::Maintenance)
            .await
            .unwrap();
        assert_eq!(car.status, CarStatus::Maintenance);
        assert!(fleet.list_available().await.unwrap().is_empty());

        let car = fleet
            .set_status("KA-01", CarStatus::Available)
            .await
            .unwrap();
        assert_eq!(car.status, CarStatus::Available);
    }

    #[tokio::test]
    async fn test_rented_car_cannot_enter_maintenance() {
        let fleet = fleet();
        let car = fleet.add_car(create_request("KA-01", "suv")).await.unwrap();
        fleet
            .transition(car.id, CarStatus::Available, CarStatus::Rented)
            .await
            .unwrap();

        let err = fleet
            .set_status("KA-01", CarStatus::Maintenance)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidTransition {
                from: CarStatus::Rented,
                to: CarStatus::Maintenance
            }
        ));
    }

    #[tokio::test]
    async fn test_transition_on_unknown_id_is_not_found() {
        let fleet = fleet();
        let err = fleet
            .transition(Uuid::new_v4(), CarStatus::Available, CarStatus::Rented)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CarNotFound(_)));
    }

    #[tokio::test]
    async fn test_lost_race_surfaces_the_real_status() {
        let fleet = fleet();
        let car = fleet.add_car(create_request("KA-01", "suv")).await.unwrap();
        fleet
            .set_status("KA-01", CarStatus::Maintenance)
            .await
            .unwrap();

        // La lectura previa (Available) quedó obsoleta: el CAS lo detecta
        // y reporta el estado real en vez de pisarlo
        let err = fleet
            .transition(car.id, CarStatus::Available, CarStatus::Rented)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidTransition {
                from: CarStatus::Maintenance,
                to: CarStatus::Rented
            }
        ));
    }

    #[tokio::test]
    async fn test_admin_path_cannot_mark_rented() {
        let fleet = fleet();
        fleet.add_car(create_request("KA-01", "suv")).await.unwrap();

        let err = fleet
            .set_status("KA-01", CarStatus::Rented)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_set_status_on_unknown_car() {
        let fleet = fleet();
        let err = fleet
            .set_status("ZZ-99", CarStatus::Maintenance)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CarNotFound(_)));
    }

    #[tokio::test]
    async fn test_unknown_category_is_accepted() {
        let fleet = fleet();
        let car = fleet
            .add_car(create_request("KA-02", "hoverboard"))
            .await
            .unwrap();
        assert_eq!(car.category, CarCategory::Unknown);
    }
}
