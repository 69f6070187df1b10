// Database entities - SeaORM models
pub mod app;
pub mod user;
