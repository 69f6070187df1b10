use sea_orm::DatabaseConnection;

use crate::config::migrate_database;

/// Run database migrations
///
/// main.rs already migrates on startup, so this mostly confirms the schema is current.
pub async fn run_migrations(db: &DatabaseConnection) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Running database migrations...");
    migrate_database(db).await?;
    println!("✅ Database schema is up to date");
    Ok(())
}
