//! Política de precios
//!
//! Tabla fija de tarifas diarias por categoría y cálculo del coste total
//! de un período. Los importes son `Decimal` de punta a punta.

use rust_decimal::Decimal;
use tracing::warn;

use crate::models::car::CarCategory;
use crate::models::rental::RentalPeriod;

/// Tarifa diaria por categoría. Las categorías no reconocidas se alquilan
/// a tarifa cero en vez de rechazarse.
pub fn daily_rate(category: CarCategory) -> Decimal {
    match category {
        CarCategory::Suv => Decimal::from(5000),
        CarCategory::Sedan => Decimal::from(4000),
        CarCategory::Mini => Decimal::from(3000),
        CarCategory::Unknown => Decimal::ZERO,
    }
}

/// Coste total del período: tarifa diaria por días (extremos inclusivos)
pub fn rental_cost(category: CarCategory, period: &RentalPeriod) -> Decimal {
    if category == CarCategory::Unknown {
        warn!("categoría desconocida, aplicando tarifa cero");
    }
    daily_rate(category) * Decimal::from(period.days())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn period(start: (i32, u32, u32), end: (i32, u32, u32)) -> RentalPeriod {
        RentalPeriod::new(
            NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_rate_table() {
        assert_eq!(daily_rate(CarCategory::Suv), Decimal::from(5000));
        assert_eq!(daily_rate(CarCategory::Sedan), Decimal::from(4000));
        assert_eq!(daily_rate(CarCategory::Mini), Decimal::from(3000));
        assert_eq!(daily_rate(CarCategory::Unknown), Decimal::ZERO);
    }

    #[test]
    fn test_three_day_sedan_costs_12000() {
        let p = period((2024, 1, 10), (2024, 1, 12));
        assert_eq!(p.days(), 3);
        assert_eq!(rental_cost(CarCategory::Sedan, &p), Decimal::from(12000));
    }

    #[test]
    fn test_same_day_rental_costs_one_day() {
        let p = period((2024, 1, 10), (2024, 1, 10));
        assert_eq!(rental_cost(CarCategory::Suv, &p), Decimal::from(5000));
    }

    #[test]
    fn test_unknown_category_costs_zero() {
        let p = period((2024, 1, 10), (2024, 1, 20));
        assert_eq!(rental_cost(CarCategory::Unknown, &p), Decimal::ZERO);
    }

    #[test]
    fn test_cost_grows_with_end_date() {
        let short = period((2024, 1, 10), (2024, 1, 11));
        let long = period((2024, 1, 10), (2024, 1, 15));
        assert!(rental_cost(CarCategory::Mini, &long) > rental_cost(CarCategory::Mini, &short));
    }
}
