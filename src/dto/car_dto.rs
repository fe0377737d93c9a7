use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::car::{Car, CarCategory, CarStatus};

// Request para registrar un coche
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCarRequest {
    #[validate(length(min = 1, max = 20))]
    pub number: String,

    #[validate(length(min = 1, max = 30))]
    pub category: String,

    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

// Request para cambiar el estado de un coche (ciclo de mantenimiento)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCarStatusRequest {
    #[validate(length(min = 1, max = 20))]
    pub status: String,
}

// Response de coche
#[derive(Debug, Serialize)]
pub struct CarResponse {
    pub id: Uuid,
    pub number: String,
    pub category: CarCategory,
    pub name: String,
    pub status: CarStatus,
}

impl From<Car> for CarResponse {
    fn from(car: Car) -> Self {
        Self {
            id: car.id,
            number: car.number,
            category: car.category,
            name: car.name,
            status: car.status,
        }
    }
}
