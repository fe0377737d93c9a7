//! Orquestador de alquileres
//!
//! Coordina el registro de flota, el libro de alquileres y la política de
//! precios en las operaciones de alquilar y devolver. Alquilar muta dos
//! recursos (estado del coche + fila del libro); si la segunda escritura
//! falla, este módulo ejecuta la compensación que devuelve el coche a
//! disponible. Un coche marcado Rented sin alquiler activo es el estado
//! que nunca debe quedar tras una operación.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::dto::rental_dto::RentRequest;
use crate::models::car::{Car, CarStatus};
use crate::models::rental::{Rental, RentalPeriod, RentalReceipt, RentalView, ReturnReceipt};
use crate::services::fleet_service::FleetService;
use crate::services::pricing;
use crate::store::RentalStore;
use crate::utils::errors::{AppError, AppResult};

/// Servicio del ciclo de vida del alquiler
#[derive(Clone)]
pub struct RentalService {
    fleet: FleetService,
    rentals: Arc<dyn RentalStore>,
}

impl RentalService {
    pub fn new(fleet: FleetService, rentals: Arc<dyn RentalStore>) -> Self {
        Self { fleet, rentals }
    }

    /// Alquila un coche para el usuario autenticado
    pub async fn rent(&self, user_id: Uuid, request: RentRequest) -> AppResult<RentalReceipt> {
        let today = Utc::now().date_naive();
        let period = RentalPeriod::validated(request.start_date, request.end_date, today)?;

        let car = self.fleet.get_by_number(&request.car_number).await?;

        // CAS Available→Rented. Si no aplica, el coche está alquilado o en
        // taller; ambos casos son "no disponible" para quien alquila.
        if let Err(err) = self
            .fleet
            .transition(car.id, CarStatus::Available, CarStatus::Rented)
            .await
        {
            return Err(match err {
                AppError::InvalidTransition { .. } => AppError::CarNotAvailable(car.number),
                other => other,
            });
        }

        let cost = pricing::rental_cost(car.category, &period);
        let rental = Rental::new(car.id, user_id, period, cost);

        match self.rentals.create_if_car_free(&rental).await {
            Ok(true) => {
                info!(
                    "📋 Alquiler {} creado: coche {} para usuario {} ({} días, {})",
                    rental.id,
                    car.number,
                    user_id,
                    period.days(),
                    cost
                );
                Ok(RentalReceipt {
                    rental_id: rental.id,
                    car_id: car.id,
                    car_number: car.number,
                    start_date: period.start_date(),
                    end_date: period.end_date(),
                    days: period.days(),
                    cost,
                })
            }
            Ok(false) => {
                // Otro alquiler activo ganó la carrera: compensar el CAS
                self.rollback_reservation(&car).await?;
                Err(AppError::RentalConflict(car.number))
            }
            Err(err) => {
                self.rollback_reservation(&car).await?;
                Err(err.into())
            }
        }
    }

    /// Compensación de un alquiler fallido: deshace el CAS dejando el
    /// coche disponible. Si tampoco puede aplicarse, el coche queda Rented
    /// sin alquiler activo y eso se reporta como inconsistencia.
    async fn rollback_reservation(&self, car: &Car) -> AppResult<()> {
        match self
            .fleet
            .transition(car.id, CarStatus::Rented, CarStatus::Available)
            .await
        {
            Ok(()) => Ok(()),
            Err(AppError::InvalidTransition { .. }) | Err(AppError::CarNotFound(_)) => {
                error!(
                    "rollback sin efecto: el coche {} ya no está Rented",
                    car.number
                );
                Err(AppError::Inconsistency(format!(
                    "car '{}' changed status during rollback",
                    car.number
                )))
            }
            Err(err) => {
                error!("rollback fallido para el coche {}: {}", car.number, err);
                Err(err)
            }
        }
    }

    /// Devuelve un coche alquilado
    pub async fn return_car(&self, car_number: &str) -> AppResult<ReturnReceipt> {
        let car = self.fleet.get_by_number(car_number).await?;

        if car.status != CarStatus::Rented {
            return Err(AppError::CarNotRented(car.number));
        }

        let returned_at = Utc::now();
        let rental = match self.rentals.close_active_by_car(car.id, returned_at).await? {
            Some(rental) => rental,
            None => {
                // Rented sin alquiler activo: defecto, no se repara en silencio
                error!(
                    "inconsistencia: coche {} marcado Rented sin alquiler activo",
                    car.number
                );
                return Err(AppError::Inconsistency(format!(
                    "car '{}' is marked rented but has no active rental",
                    car.number
                )));
            }
        };

        if let Err(err) = self
            .fleet
            .transition(car.id, CarStatus::Rented, CarStatus::Available)
            .await
        {
            match err {
                AppError::InvalidTransition { .. } | AppError::CarNotFound(_) => {
                    error!(
                        "inconsistencia: alquiler {} cerrado pero el coche {} no pasó a Available",
                        rental.id, car.number
                    );
                    return Err(AppError::Inconsistency(format!(
                        "rental closed but car '{}' could not be freed",
                        car.number
                    )));
                }
                other => return Err(other),
            }
        }

        info!("✅ Coche {} devuelto (alquiler {})", car.number, rental.id);

        Ok(ReturnReceipt {
            rental_id: rental.id,
            car_id: car.id,
            car_number: car.number,
            cost: rental.cost,
            returned_at,
        })
    }

    /// Alquileres activos del usuario, enriquecidos con datos del coche
    pub async fn rentals_for_user(&self, user_id: Uuid) -> AppResult<Vec<RentalView>> {
        let rentals = self.rentals.list_active_by_user(user_id).await?;

        let mut views = Vec::with_capacity(rentals.len());
        for rental in rentals {
            let car = match self.fleet.get_by_id(rental.car_id).await {
                Ok(car) => car,
                Err(AppError::CarNotFound(_)) => {
                    warn!("alquiler {} apunta a un coche inexistente", rental.id);
                    continue;
                }
                Err(err) => return Err(err),
            };
            let Ok(period) = rental.period() else {
                warn!("alquiler {} con fechas corruptas", rental.id);
                continue;
            };
            views.push(RentalView {
                rental_id: rental.id,
                car_number: car.number,
                car_name: car.name,
                category: car.category,
                start_date: rental.start_date,
                end_date: rental.end_date,
                days: period.days(),
                cost: rental.cost,
            });
        }

        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::car_dto::CreateCarRequest;
    use crate::store::{CarStore, MemoryStore};
    use chrono::Duration;
    use rust_decimal::Decimal;

    fn services() -> (FleetService, RentalService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let fleet = FleetService::new(store.clone());
        let rentals = RentalService::new(fleet.clone(), store.clone());
        (fleet, rentals, store)
    }

    async fn add_car(fleet: &FleetService, number: &str, category: &str) -> Car {
        fleet
            .add_car(CreateCarRequest {
                number: number.to_string(),
                category: category.to_string(),
                name: format!("Car {}", number),
            })
            .await
            .unwrap()
    }

    /// Fechas relativas a hoy para que los tests no dependan del calendario
    fn request(number: &str, start_offset: i64, end_offset: i64) -> RentRequest {
        let today = Utc::now().date_naive();
        RentRequest {
            car_number: number.to_string(),
            start_date: today + Duration::days(start_offset),
            end_date: today + Duration::days(end_offset),
        }
    }

    #[tokio::test]
    async fn test_rent_a_sedan_for_three_days() {
        let (fleet, service, _) = services();
        add_car(&fleet, "KA-01", "sedan").await;
        let user = Uuid::new_v4();

        let receipt = service.rent(user, request("KA-01", 0, 2)).await.unwrap();

        assert_eq!(receipt.days, 3);
        assert_eq!(receipt.cost, Decimal::from(12000));
        assert_eq!(receipt.car_number, "KA-01");

        let car = fleet.get_by_number("KA-01").await.unwrap();
        assert_eq!(car.status, CarStatus::Rented);
    }

    #[tokio::test]
    async fn test_rented_car_cannot_be_rented_again() {
        let (fleet, service, _) = services();
        add_car(&fleet, "KA-01", "sedan").await;

        service
            .rent(Uuid::new_v4(), request("KA-01", 0, 2))
            .await
            .unwrap();

        let err = service
            .rent(Uuid::new_v4(), request("KA-01", 0, 2))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CarNotAvailable(n) if n == "KA-01"));
    }

    #[tokio::test]
    async fn test_returned_car_can_be_rented_again() {
        let (fleet, service, _) = services();
        add_car(&fleet, "KA-01", "sedan").await;
        let user = Uuid::new_v4();

        let receipt = service.rent(user, request("KA-01", 0, 2)).await.unwrap();
        let returned = service.return_car("KA-01").await.unwrap();
        assert_eq!(returned.rental_id, receipt.rental_id);
        assert_eq!(returned.cost, receipt.cost);

        let car = fleet.get_by_number("KA-01").await.unwrap();
        assert_eq!(car.status, CarStatus::Available);

        service.rent(user, request("KA-01", 0, 1)).await.unwrap();
    }

    #[tokio::test]
    async fn test_rent_starting_yesterday_is_rejected() {
        let (fleet, service, _) = services();
        add_car(&fleet, "KA-01", "sedan").await;

        let err = service
            .rent(Uuid::new_v4(), request("KA-01", -1, 2))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidDateRange(_)));
    }

    #[tokio::test]
    async fn test_inverted_dates_are_rejected() {
        let (fleet, service, _) = services();
        add_car(&fleet, "KA-01", "sedan").await;

        let err = service
            .rent(Uuid::new_v4(), request("KA-01", 3, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidDateRange(_)));
    }

    #[tokio::test]
    async fn test_returning_an_available_car_is_rejected() {
        let (fleet, service, _) = services();
        add_car(&fleet, "KA-01", "sedan").await;

        let err = service.return_car("KA-01").await.unwrap_err();
        assert!(matches!(err, AppError::CarNotRented(n) if n == "KA-01"));
    }

    #[tokio::test]
    async fn test_unknown_car_number() {
        let (_, service, _) = services();
        let err = service
            .rent(Uuid::new_v4(), request("ZZ-99", 0, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CarNotFound(_)));

        let err = service.return_car("ZZ-99").await.unwrap_err();
        assert!(matches!(err, AppError::CarNotFound(_)));
    }

    #[tokio::test]
    async fn test_car_in_maintenance_is_not_available() {
        let (fleet, service, _) = services();
        add_car(&fleet, "KA-01", "sedan").await;
        fleet
            .set_status("KA-01", CarStatus::Maintenance)
            .await
            .unwrap();

        let err = service
            .rent(Uuid::new_v4(), request("KA-01", 0, 2))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CarNotAvailable(_)));
    }

    #[tokio::test]
    async fn test_unknown_category_rents_at_zero() {
        let (fleet, service, _) = services();
        add_car(&fleet, "KA-02", "hoverboard").await;

        let receipt = service
            .rent(Uuid::new_v4(), request("KA-02", 0, 4))
            .await
            .unwrap();
        assert_eq!(receipt.days, 5);
        assert_eq!(receipt.cost, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_ledger_conflict_rolls_back_the_reservation() {
        let (fleet, service, store) = services();
        let car = add_car(&fleet, "KA-01", "sedan").await;

        // Alquiler activo huérfano sembrado directamente en el libro: el
        // coche sigue Available, así que el CAS del rent tendrá éxito y
        // la inserción fallará después.
        let period = RentalPeriod::new(
            Utc::now().date_naive(),
            Utc::now().date_naive() + Duration::days(1),
        )
        .unwrap();
        let orphan = Rental::new(car.id, Uuid::new_v4(), period, Decimal::from(8000));
        assert!(store.create_if_car_free(&orphan).await.unwrap());

        let err = service
            .rent(Uuid::new_v4(), request("KA-01", 0, 2))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::RentalConflict(n) if n == "KA-01"));

        // La compensación dejó el coche como estaba
        let car = fleet.get_by_number("KA-01").await.unwrap();
        assert_eq!(car.status, CarStatus::Available);
    }

    #[tokio::test]
    async fn test_rented_without_active_rental_reports_inconsistency() {
        let (fleet, service, store) = services();
        let car = add_car(&fleet, "KA-01", "sedan").await;

        // Estado corrupto a propósito: Rented sin fila activa en el libro
        assert!(store
            .transition(car.id, CarStatus::Available, CarStatus::Rented)
            .await
            .unwrap());

        let err = service.return_car("KA-01").await.unwrap_err();
        assert!(matches!(err, AppError::Inconsistency(_)));

        // Sin reparación silenciosa: el estado sigue siendo Rented
        let car = fleet.get_by_number("KA-01").await.unwrap();
        assert_eq!(car.status, CarStatus::Rented);
    }

    #[tokio::test]
    async fn test_rentals_for_user_shows_active_only() {
        let (fleet, service, _) = services();
        add_car(&fleet, "KA-01", "sedan").await;
        add_car(&fleet, "KA-02", "suv").await;
        let user = Uuid::new_v4();

        service.rent(user, request("KA-01", 0, 2)).await.unwrap();
        service.rent(user, request("KA-02", 1, 1)).await.unwrap();

        // Alquiler de otro usuario que no debe aparecer
        add_car(&fleet, "KA-03", "mini").await;
        service
            .rent(Uuid::new_v4(), request("KA-03", 0, 1))
            .await
            .unwrap();

        let views = service.rentals_for_user(user).await.unwrap();
        assert_eq!(views.len(), 2);
        assert!(views.iter().any(|v| v.car_number == "KA-01" && v.days == 3));
        assert!(views.iter().any(|v| v.car_number == "KA-02" && v.days == 1));

        service.return_car("KA-01").await.unwrap();
        let views = service.rentals_for_user(user).await.unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].car_number, "KA-02");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_rents_admit_exactly_one_winner() {
        let (fleet, service, store) = services();
        let car = add_car(&fleet, "KA-01", "sedan").await;

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let service = service.clone();
                let req = request("KA-01", 1, 3);
                tokio::spawn(async move { service.rent(Uuid::new_v4(), req).await })
            })
            .collect();

        let results = futures::future::join_all(tasks).await;

        let mut winners = 0;
        for result in results {
            match result.unwrap() {
                Ok(_) => winners += 1,
                // Los perdedores fallan rápido, nunca se encolan
                Err(AppError::CarNotAvailable(_)) | Err(AppError::RentalConflict(_)) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(winners, 1);

        // Invariante: Rented ⇔ exactamente un alquiler activo
        let stored = fleet.get_by_number("KA-01").await.unwrap();
        assert_eq!(stored.status, CarStatus::Rented);
        assert!(store.get_active_by_car(car.id).await.unwrap().is_some());
    }
}
