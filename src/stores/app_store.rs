use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, DatabaseConnection, EntityTrait, Set};

use crate::errors::StoreError;
use crate::stores::AppProvider;
use crate::stores::user_store::is_unique_violation;
use crate::types::db::app;
use crate::types::internal::models::App;

/// SQLite-backed application registry
pub struct AppStore {
    db: DatabaseConnection,
}

impl AppStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Register a new application
    ///
    /// # Returns
    /// * `Ok(App)` - The stored application with its assigned id
    /// * `Err(StoreError::AppExists)` - The name is taken
    pub async fn create_app(&self, name: &str, secret: &str) -> Result<App, StoreError> {
        let new_app = app::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
            secret: Set(secret.to_string()),
            created_at: Set(Utc::now().timestamp()),
        };

        let inserted = new_app.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::AppExists(name.to_string())
            } else {
                StoreError::database("insert_app", e)
            }
        })?;

        tracing::info!("app {} registered with id {}", inserted.name, inserted.id);
        Ok(App::from(inserted))
    }
}

#[async_trait]
impl AppProvider for AppStore {
    async fn app(&self, app_id: i32) -> Result<App, StoreError> {
        let model = app::Entity::find_by_id(app_id)
            .one(&self.db)
            .await
            .map_err(|e| StoreError::database("find_app_by_id", e))?;

        model.map(App::from).ok_or(StoreError::AppNotFound(app_id))
    }
}
