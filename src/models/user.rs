//! Modelo de User
//!
//! El usuario se identifica por `username` (único). El hash de la
//! contraseña se calcula en el servicio de auth; aquí solo se guarda.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub contact_number: String,
    pub email: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        username: String,
        password_hash: String,
        name: String,
        contact_number: String,
        email: String,
        address: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
            name,
            contact_number,
            email,
            address,
            created_at: Utc::now(),
        }
    }
}

/// Perfil público del usuario: nunca expone el hash
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub contact_number: String,
    pub email: String,
    pub address: Option<String>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
            contact_number: user.contact_number,
            email: user.email,
            address: user.address,
        }
    }
}
