//! Almacenamiento en memoria
//!
//! Implementación de los traits del store sobre HashMaps protegidos por un
//! único `RwLock`. Es el backend por defecto cuando no hay `DATABASE_URL` y
//! el que usan los tests de integración. Al compartir un solo lock, las
//! operaciones compuestas (chequeo + inserción, compare-and-set) son
//! atómicas sin más esfuerzo.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::car::{Car, CarStatus};
use crate::models::rental::Rental;
use crate::models::user::User;
use crate::store::{
    CarStore, RentalStore, StoreError, UserStore, CARS_NUMBER_KEY, USERS_USERNAME_KEY,
};

#[derive(Default)]
struct Inner {
    cars: HashMap<Uuid, Car>,
    rentals: HashMap<Uuid, Rental>,
    users: HashMap<Uuid, User>,
}

/// Store en memoria para desarrollo y tests
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl CarStore for MemoryStore {
    async fn create(&self, car: &Car) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner.cars.values().any(|c| c.number == car.number) {
            return Err(StoreError::UniqueViolation {
                constraint: CARS_NUMBER_KEY.to_string(),
            });
        }
        inner.cars.insert(car.id, car.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Car>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.cars.get(&id).cloned())
    }

    async fn get_by_number(&self, number: &str) -> Result<Option<Car>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.cars.values().find(|c| c.number == number).cloned())
    }

    async fn list(&self) -> Result<Vec<Car>, StoreError> {
        let inner = self.inner.read().await;
        let mut cars: Vec<Car> = inner.cars.values().cloned().collect();
        cars.sort_by(|a, b| a.number.cmp(&b.number));
        Ok(cars)
    }

    async fn list_by_status(&self, status: CarStatus) -> Result<Vec<Car>, StoreError> {
        let inner = self.inner.read().await;
        let mut cars: Vec<Car> = inner
            .cars
            .values()
            .filter(|c| c.status == status)
            .cloned()
            .collect();
        cars.sort_by(|a, b| a.number.cmp(&b.number));
        Ok(cars)
    }

    async fn transition(
        &self,
        id: Uuid,
        from: CarStatus,
        to: CarStatus,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.cars.get_mut(&id) {
            Some(car) if car.status == from => {
                car.status = to;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait::async_trait]
impl RentalStore for MemoryStore {
    async fn create_if_car_free(&self, rental: &Rental) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let occupied = inner
            .rentals
            .values()
            .any(|r| r.car_id == rental.car_id && r.is_active());
        if occupied {
            return Ok(false);
        }
        inner.rentals.insert(rental.id, rental.clone());
        Ok(true)
    }

    async fn get_active_by_car(&self, car_id: Uuid) -> Result<Option<Rental>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .rentals
            .values()
            .find(|r| r.car_id == car_id && r.is_active())
            .cloned())
    }

    async fn close_active_by_car(
        &self,
        car_id: Uuid,
        returned_at: DateTime<Utc>,
    ) -> Result<Option<Rental>, StoreError> {
        let mut inner = self.inner.write().await;
        let rental = inner
            .rentals
            .values_mut()
            .find(|r| r.car_id == car_id && r.is_active());
        match rental {
            Some(rental) => {
                rental.returned_at = Some(returned_at);
                Ok(Some(rental.clone()))
            }
            None => Ok(None),
        }
    }

    async fn list_active_by_user(&self, user_id: Uuid) -> Result<Vec<Rental>, StoreError> {
        let inner = self.inner.read().await;
        let mut rentals: Vec<Rental> = inner
            .rentals
            .values()
            .filter(|r| r.user_id == user_id && r.is_active())
            .cloned()
            .collect();
        rentals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rentals)
    }
}

#[async_trait::async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, user: &User) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::UniqueViolation {
                constraint: USERS_USERNAME_KEY.to_string(),
            });
        }
        inner.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}
