//! Sistema de alquiler de coches
//!
//! Backend HTTP para un negocio de alquiler de vehículos: registro y
//! autenticación de usuarios, inventario de flota con estados de
//! disponibilidad y ciclo de vida del alquiler (alquilar, calcular coste,
//! devolver). La lógica de negocio vive en `services`; la capa HTTP en
//! `routes` solo traduce requests y responses.

pub mod config;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod utils;
