//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación: inventario
//! de flota, autenticación, política de precios y el ciclo de vida del
//! alquiler. Los servicios hablan con el almacenamiento a través de los
//! traits de `store` y nunca formatean texto para el usuario final.

pub mod auth_service;
pub mod fleet_service;
pub mod pricing;
pub mod rental_service;

pub use auth_service::*;
pub use fleet_service::*;
pub use rental_service::*;
