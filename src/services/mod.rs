// Services layer - Business logic and orchestration
pub mod auth_service;
pub mod request_validator;

pub use auth_service::AuthService;
pub use request_validator::RequestValidator;

#[cfg(test)]
mod auth_service_tests;
