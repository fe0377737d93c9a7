//! Middleware del sistema
//!
//! Este módulo contiene el middleware de autenticación JWT y la
//! configuración de CORS.

pub mod auth_middleware;
pub mod cors;

pub use auth_middleware::*;
pub use cors::*;
