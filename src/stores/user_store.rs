use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set, SqlErr,
};

use crate::errors::StoreError;
use crate::stores::{UserProvider, UserSaver};
use crate::types::db::user;
use crate::types::internal::models::User;

/// SQLite-backed user store
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Set or clear the admin flag of a user
    ///
    /// # Returns
    /// * `Ok(())` - Flag updated
    /// * `Err(StoreError::UserNotFound)` - No user has this id
    pub async fn set_admin(&self, user_id: i64, is_admin: bool) -> Result<(), StoreError> {
        let result = user::Entity::update_many()
            .col_expr(user::Column::IsAdmin, Expr::value(is_admin))
            .filter(user::Column::Id.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| StoreError::database("set_admin", e))?;

        if result.rows_affected == 0 {
            return Err(StoreError::UserNotFound(user_id.to_string()));
        }

        tracing::info!("admin flag for user {} set to {}", user_id, is_admin);
        Ok(())
    }
}

pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[async_trait]
impl UserSaver for UserStore {
    async fn save_user(&self, email: &str, password_hash: &str) -> Result<i64, StoreError> {
        let new_user = user::ActiveModel {
            id: NotSet,
            email: Set(email.to_string()),
            pass_hash: Set(password_hash.to_string()),
            is_admin: Set(false),
            created_at: Set(Utc::now().timestamp()),
        };

        let inserted = new_user.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::UserExists(email.to_string())
            } else {
                StoreError::database("insert_user", e)
            }
        })?;

        Ok(inserted.id)
    }
}

#[async_trait]
impl UserProvider for UserStore {
    async fn user(&self, email: &str) -> Result<User, StoreError> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| StoreError::database("find_user_by_email", e))?;

        model
            .map(User::from)
            .ok_or_else(|| StoreError::UserNotFound(email.to_string()))
    }

    async fn is_admin(&self, user_id: i64) -> Result<bool, StoreError> {
        let model = user::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| StoreError::database("find_user_by_id", e))?;

        model
            .map(|u| u.is_admin)
            .ok_or_else(|| StoreError::UserNotFound(user_id.to_string()))
    }
}
