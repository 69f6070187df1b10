use poem_openapi::Object;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Request model for user login
#[derive(Object, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email address of the account
    pub email: String,

    /// Password for authentication
    pub password: String,

    /// Application the token is issued for
    pub app_id: i32,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("app_id", &self.app_id)
            .finish()
    }
}

/// Response model for a successful login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Signed token scoped to the requested application
    pub token: String,
}

/// Request model for user registration
#[derive(Object, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Email address to register
    pub email: String,

    /// Password for the new account
    pub password: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Response model for a successful registration
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// Identifier assigned by storage
    pub user_id: i64,
}

/// Request model for the admin privilege check
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct IsAdminRequest {
    /// User to check
    pub user_id: i64,
}

/// Response model for the admin privilege check
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct IsAdminResponse {
    pub is_admin: bool,
}
