pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

pub use extractors::AuthenticatedUserId;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{generate_token, verify_token, Claims, JwtKeys};

/// Immutable authentication state shared by all workers as `web::Data<AuthSettings>`.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub keys: JwtKeys,
    pub bcrypt_cost: u32,
}

impl AuthSettings {
    pub fn new(keys: JwtKeys, bcrypt_cost: u32) -> Self {
        Self { keys, bcrypt_cost }
    }
}

/// Represents the payload for a user login request.
///
/// Deliberately unvalidated: an unknown email is a 404 and a wrong password a 401,
/// whatever their shape.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name, 1 to 50 characters.
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    /// Must be a valid email format. Unique across users.
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Response body for a successful registration or login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    /// The JWT to send back as `Authorization: Bearer <token>`.
    pub token: String,
}
