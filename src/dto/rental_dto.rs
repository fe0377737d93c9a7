use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

// Request para alquilar un coche. Las fechas llegan como YYYY-MM-DD;
// el orden y el "no empezar en el pasado" se validan en el servicio.
#[derive(Debug, Deserialize, Validate)]
pub struct RentRequest {
    #[validate(length(min = 1, max = 20))]
    pub car_number: String,

    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

// Request para devolver un coche
#[derive(Debug, Deserialize, Validate)]
pub struct ReturnRequest {
    #[validate(length(min = 1, max = 20))]
    pub car_number: String,
}
