//! Modelo de Car
//!
//! Este módulo contiene el struct Car, su categoría tarifaria y la máquina
//! de estados de disponibilidad. Las transiciones de estado solo se aplican
//! a través del registro de flota; aquí se define cuáles son legales.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Categoría del coche: determina la tarifa diaria
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarCategory {
    Suv,
    Sedan,
    Mini,
    /// Categoría no reconocida: se acepta pero su tarifa es cero
    Unknown,
}

impl CarCategory {
    /// Interpreta la categoría sin distinguir mayúsculas; lo que no se
    /// reconoce queda como `Unknown` en vez de rechazarse
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "suv" => CarCategory::Suv,
            "sedan" => CarCategory::Sedan,
            "mini" => CarCategory::Mini,
            _ => CarCategory::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CarCategory::Suv => "suv",
            CarCategory::Sedan => "sedan",
            CarCategory::Mini => "mini",
            CarCategory::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CarCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estado de disponibilidad del coche
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarStatus {
    Available,
    Rented,
    Maintenance,
}

impl CarStatus {
    /// Interpreta un estado almacenado o recibido; `None` si no es válido
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "available" => Some(CarStatus::Available),
            "rented" => Some(CarStatus::Rented),
            "maintenance" => Some(CarStatus::Maintenance),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CarStatus::Available => "available",
            CarStatus::Rented => "rented",
            CarStatus::Maintenance => "maintenance",
        }
    }

    /// Transiciones legales: alquilar y devolver, más el ciclo de
    /// mantenimiento desde/hacia disponible. Todo lo demás se rechaza.
    pub fn can_transition_to(self, to: CarStatus) -> bool {
        matches!(
            (self, to),
            (CarStatus::Available, CarStatus::Rented)
                | (CarStatus::Rented, CarStatus::Available)
                | (CarStatus::Available, CarStatus::Maintenance)
                | (CarStatus::Maintenance, CarStatus::Available)
        )
    }
}

impl fmt::Display for CarStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Car principal: `number` es la clave de negocio única e inmutable
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Car {
    pub id: Uuid,
    pub number: String,
    pub category: CarCategory,
    pub name: String,
    pub status: CarStatus,
    pub created_at: DateTime<Utc>,
}

impl Car {
    /// Crea un coche nuevo; los coches recién registrados están disponibles
    pub fn new(number: String, category: CarCategory, name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            number,
            category,
            name,
            status: CarStatus::Available,
            created_at: Utc::now(),
        }
    }
}
