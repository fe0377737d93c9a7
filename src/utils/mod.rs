//! Utilidades del sistema
//!
//! Manejo de errores y helpers de JWT compartidos por toda la aplicación.

pub mod errors;
pub mod jwt;
