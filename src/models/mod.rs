//! Modelos del sistema
//!
//! Este módulo contiene los modelos de dominio: coches, alquileres y
//! usuarios, junto con sus invariantes de estado.

pub mod car;
pub mod rental;
pub mod user;
