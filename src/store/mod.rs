//! Capa de almacenamiento
//!
//! Define los traits de acceso a datos y sus dos implementaciones:
//! `MemoryStore` (HashMaps bajo RwLock, para desarrollo y tests) y
//! `PgStore` (PostgreSQL con SQLx). Los servicios solo conocen los traits,
//! así que el backend se elige en el arranque sin tocar la lógica.
//!
//! Las dos garantías de concurrencia viven aquí: `transition` es un
//! compare-and-set sobre el estado del coche, y `create_if_car_free` es un
//! chequeo-e-inserción atómico que impide dos alquileres activos del mismo
//! coche. Todo lo demás son lecturas y escrituras simples.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::car::{Car, CarStatus};
use crate::models::rental::Rental;
use crate::models::user::User;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Nombres de constraint únicos. `MemoryStore` reporta los mismos nombres
/// que los índices de PostgreSQL para que los servicios traduzcan
/// violaciones de unicidad sin saber qué backend hay detrás.
pub const CARS_NUMBER_KEY: &str = "cars_number_key";
pub const USERS_USERNAME_KEY: &str = "users_username_key";
pub const ONE_ACTIVE_RENTAL_PER_CAR: &str = "rentals_one_active_per_car";

/// Errores de la capa de almacenamiento
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),

    #[error("unique constraint '{constraint}' violated")]
    UniqueViolation { constraint: String },
}

impl StoreError {
    /// `true` si el error es la violación del constraint indicado
    pub fn is_unique_violation(&self, name: &str) -> bool {
        matches!(self, StoreError::UniqueViolation { constraint } if constraint == name)
    }
}

/// Acceso al inventario de coches
#[async_trait::async_trait]
pub trait CarStore: Send + Sync {
    /// Inserta un coche nuevo. Falla con `UniqueViolation` de
    /// [`CARS_NUMBER_KEY`] si el número ya está registrado.
    async fn create(&self, car: &Car) -> Result<(), StoreError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Car>, StoreError>;

    async fn get_by_number(&self, number: &str) -> Result<Option<Car>, StoreError>;

    /// Todos los coches, ordenados por número
    async fn list(&self) -> Result<Vec<Car>, StoreError>;

    /// Coches en un estado concreto, ordenados por número
    async fn list_by_status(&self, status: CarStatus) -> Result<Vec<Car>, StoreError>;

    /// Compare-and-set del estado: cambia a `to` solo si el estado actual
    /// es exactamente `from`. Devuelve `false` (sin modificar nada) si el
    /// coche no existe o su estado ya no es `from`.
    async fn transition(&self, id: Uuid, from: CarStatus, to: CarStatus)
        -> Result<bool, StoreError>;
}

/// Acceso al libro de alquileres
#[async_trait::async_trait]
pub trait RentalStore: Send + Sync {
    /// Inserta el alquiler solo si el coche no tiene otro alquiler activo.
    /// Devuelve `false` (sin insertar) si ya existe uno; el chequeo y la
    /// inserción son atómicos frente a peticiones concurrentes.
    async fn create_if_car_free(&self, rental: &Rental) -> Result<bool, StoreError>;

    async fn get_active_by_car(&self, car_id: Uuid) -> Result<Option<Rental>, StoreError>;

    /// Cierra el alquiler activo del coche marcándolo con `returned_at`.
    /// Devuelve el alquiler cerrado, o `None` si no había ninguno activo.
    async fn close_active_by_car(
        &self,
        car_id: Uuid,
        returned_at: DateTime<Utc>,
    ) -> Result<Option<Rental>, StoreError>;

    /// Alquileres activos de un usuario, del más reciente al más antiguo
    async fn list_active_by_user(&self, user_id: Uuid) -> Result<Vec<Rental>, StoreError>;
}

/// Acceso a las cuentas de usuario
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Inserta un usuario nuevo. Falla con `UniqueViolation` de
    /// [`USERS_USERNAME_KEY`] si el username ya está en uso.
    async fn create(&self, user: &User) -> Result<(), StoreError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
}
