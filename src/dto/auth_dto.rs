use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user::UserProfile;

// Request de registro
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,

    #[validate(length(min = 6, max = 100))]
    pub password: String,

    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(min = 6, max = 20))]
    pub contact_number: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(max = 200))]
    pub address: Option<String>,
}

// Request de login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,

    #[validate(length(min = 6, max = 100))]
    pub password: String,
}

// Response de login exitoso
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserProfile,
}
