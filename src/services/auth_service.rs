//! Servicio de autenticación
//!
//! Registro y login contra el `UserStore`. Las contraseñas se guardan con
//! bcrypt y el login responde lo mismo si falla el usuario o la
//! contraseña, para no revelar cuál de los dos fue.

use std::sync::Arc;

use bcrypt::{hash, verify, DEFAULT_COST};
use tracing::{info, warn};

use crate::dto::auth_dto::{LoginRequest, LoginResponse, RegisterRequest};
use crate::models::user::{User, UserProfile};
use crate::store::{UserStore, USERS_USERNAME_KEY};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::jwt::{generate_token, JwtConfig};

/// Servicio de cuentas y sesiones
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt: JwtConfig,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, jwt: JwtConfig) -> Self {
        Self { users, jwt }
    }

    /// Registra una cuenta nueva
    pub async fn register(&self, request: RegisterRequest) -> AppResult<UserProfile> {
        let password_hash = hash(&request.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("failed to hash password: {}", e)))?;

        let user = User::new(
            request.username,
            password_hash,
            request.name,
            request.contact_number,
            request.email,
            request.address,
        );

        match self.users.create(&user).await {
            Ok(()) => {
                info!("👤 Usuario {} registrado", user.username);
                Ok(user.into())
            }
            Err(err) if err.is_unique_violation(USERS_USERNAME_KEY) => {
                Err(AppError::DuplicateUsername(user.username))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Verifica credenciales y emite un JWT
    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        let user = match self.users.get_by_username(&request.username).await? {
            Some(user) => user,
            None => {
                warn!("login fallido: usuario '{}' no existe", request.username);
                return Err(AppError::InvalidCredentials);
            }
        };

        let valid = verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("failed to verify password: {}", e)))?;
        if !valid {
            warn!("login fallido para '{}'", user.username);
            return Err(AppError::InvalidCredentials);
        }

        let token = generate_token(user.id, &user.username, &self.jwt)?;

        Ok(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.expiration,
            user: user.into(),
        })
    }
}
