//! Estado compartido de la aplicación
//!
//! Los handlers reciben este estado vía `State<AppState>` y construyen
//! los servicios que necesitan a partir de los stores compartidos.

use std::sync::Arc;

use crate::store::{CarStore, RentalStore, UserStore};
use crate::utils::jwt::JwtConfig;

/// Estado compartido entre todos los handlers del router
#[derive(Clone)]
pub struct AppState {
    pub cars: Arc<dyn CarStore>,
    pub rentals: Arc<dyn RentalStore>,
    pub users: Arc<dyn UserStore>,
    pub jwt: JwtConfig,
}

impl AppState {
    /// Construye el estado sobre un backend que implementa los tres stores
    pub fn new<S>(store: Arc<S>, jwt: JwtConfig) -> Self
    where
        S: CarStore + RentalStore + UserStore + 'static,
    {
        Self {
            cars: store.clone(),
            rentals: store.clone(),
            users: store,
            jwt,
        }
    }
}
