//! Modelos de alquiler
//!
//! `RentalPeriod` es el rango de fechas validado (inclusivo en ambos
//! extremos), `Rental` es la fila del libro de alquileres y los receipts
//! son lo que devuelven las operaciones de alquilar/devolver.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::car::CarCategory;
use crate::utils::errors::AppError;

/// Rango de fechas de un alquiler. Los campos son privados: solo se puede
/// construir a través de `new`/`validated`, así que un período ya creado
/// siempre cumple `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RentalPeriod {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl RentalPeriod {
    /// Construye un período verificando solo el orden de las fechas.
    /// Útil para cálculos sobre alquileres históricos.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Result<Self, AppError> {
        if start_date > end_date {
            return Err(AppError::InvalidDateRange(format!(
                "start date {} is after end date {}",
                start_date, end_date
            )));
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// Construye un período para un alquiler nuevo: además del orden,
    /// exige que no empiece en el pasado respecto a `today`
    pub fn validated(
        start_date: NaiveDate,
        end_date: NaiveDate,
        today: NaiveDate,
    ) -> Result<Self, AppError> {
        if start_date < today {
            return Err(AppError::InvalidDateRange(format!(
                "start date {} is in the past (today is {})",
                start_date, today
            )));
        }
        Self::new(start_date, end_date)
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Duración inclusiva: alquilar y devolver el mismo día cuenta 1 día
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

/// Fila del libro de alquileres. `returned_at == None` significa activo;
/// el almacén garantiza como máximo una fila activa por coche.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rental {
    pub id: Uuid,
    pub car_id: Uuid,
    pub user_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub cost: Decimal,
    pub created_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
}

impl Rental {
    pub fn new(car_id: Uuid, user_id: Uuid, period: RentalPeriod, cost: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            car_id,
            user_id,
            start_date: period.start_date(),
            end_date: period.end_date(),
            cost,
            created_at: Utc::now(),
            returned_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.returned_at.is_none()
    }

    /// Período del alquiler; las fechas ya se validaron al crearlo
    pub fn period(&self) -> Result<RentalPeriod, AppError> {
        RentalPeriod::new(self.start_date, self.end_date)
    }
}

/// Resultado de un alquiler exitoso
#[derive(Debug, Clone, Serialize)]
pub struct RentalReceipt {
    pub rental_id: Uuid,
    pub car_id: Uuid,
    pub car_number: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: i64,
    pub cost: Decimal,
}

/// Resultado de una devolución exitosa
#[derive(Debug, Clone, Serialize)]
pub struct ReturnReceipt {
    pub rental_id: Uuid,
    pub car_id: Uuid,
    pub car_number: String,
    pub cost: Decimal,
    pub returned_at: DateTime<Utc>,
}

/// Alquiler activo de un usuario, enriquecido con los datos del coche
#[derive(Debug, Clone, Serialize)]
pub struct RentalView {
    pub rental_id: Uuid,
    pub car_number: String,
    pub car_name: String,
    pub category: CarCategory,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: i64,
    pub cost: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_same_day_counts_one_day() {
        let period = RentalPeriod::new(date(2024, 3, 10), date(2024, 3, 10)).unwrap();
        assert_eq!(period.days(), 1);
    }

    #[test]
    fn test_inclusive_duration() {
        let period = RentalPeriod::new(date(2024, 3, 10), date(2024, 3, 12)).unwrap();
        assert_eq!(period.days(), 3);
    }

    #[test]
    fn test_rejects_inverted_range() {
        let result = RentalPeriod::new(date(2024, 3, 12), date(2024, 3, 10));
        assert!(matches!(result, Err(AppError::InvalidDateRange(_))));
    }

    #[test]
    fn test_validated_rejects_past_start() {
        let today = date(2024, 3, 10);
        let result = RentalPeriod::validated(date(2024, 3, 9), date(2024, 3, 15), today);
        assert!(matches!(result, Err(AppError::InvalidDateRange(_))));
    }

    #[test]
    fn test_validated_accepts_today() {
        let today = date(2024, 3, 10);
        let period = RentalPeriod::validated(today, date(2024, 3, 15), today).unwrap();
        assert_eq!(period.days(), 6);
    }

    #[test]
    fn test_new_rental_is_active() {
        let period = RentalPeriod::new(date(2024, 3, 10), date(2024, 3, 12)).unwrap();
        let rental = Rental::new(Uuid::new_v4(), Uuid::new_v4(), period, Decimal::from(12000));
        assert!(rental.is_active());
        assert_eq!(rental.start_date, date(2024, 3, 10));
        assert_eq!(rental.end_date, date(2024, 3, 12));
    }
}
