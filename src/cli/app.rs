// Application registration CLI commands

use sea_orm::DatabaseConnection;

use crate::errors::StoreError;
use crate::providers::CryptoProvider;
use crate::stores::AppStore;
use crate::types::internal::context::RequestContext;
use crate::types::internal::models::App;

const GENERATED_SECRET_LEN: usize = 48;

/// Register an application
///
/// Generates a signing secret when none is given. The secret is printed once.
///
/// # Returns
/// * `Ok(App)` - The stored application
/// * `Err(...)` - Empty name or secret, duplicate name, or database failure
pub async fn add_app(
    db: DatabaseConnection,
    name: &str,
    secret: Option<String>,
) -> Result<App, Box<dyn std::error::Error>> {
    let ctx = RequestContext::for_cli("app_add");

    let name = name.trim();
    if name.is_empty() {
        return Err("application name must not be empty".into());
    }

    let secret = match secret {
        Some(s) if s.is_empty() => return Err("application secret must not be empty".into()),
        Some(s) => s,
        None => CryptoProvider::generate_secret(GENERATED_SECRET_LEN),
    };

    let store = AppStore::new(db);
    match store.create_app(name, &secret).await {
        Ok(app) => {
            tracing::info!(request_id = %ctx.request_id, app_id = app.id, app_name = %app.name, "Application registered");
            println!("✅ Application '{}' registered with id {}", app.name, app.id);
            println!("   Secret: {}", app.secret);
            Ok(app)
        }
        Err(StoreError::AppExists(name)) => {
            println!("❌ Error: application '{}' already exists", name);
            Err(StoreError::AppExists(name).into())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::AppProvider;
    use crate::test::utils::setup_test_db;

    #[tokio::test]
    async fn test_add_app_generates_secret() {
        let db = setup_test_db().await;

        let app = add_app(db.clone(), "billing", None).await.unwrap();

        assert_eq!(app.secret.len(), GENERATED_SECRET_LEN);
        let stored = AppStore::new(db).app(app.id).await.unwrap();
        assert_eq!(stored.secret, app.secret);
    }

    #[tokio::test]
    async fn test_add_app_keeps_given_secret() {
        let db = setup_test_db().await;

        let app = add_app(db, "billing", Some("s3cret".to_string())).await.unwrap();

        assert_eq!(app.secret, "s3cret");
    }

    #[tokio::test]
    async fn test_add_app_rejects_duplicate_and_blank() {
        let db = setup_test_db().await;
        add_app(db.clone(), "billing", None).await.unwrap();

        assert!(add_app(db.clone(), "billing", None).await.is_err());
        assert!(add_app(db.clone(), "  ", None).await.is_err());
        assert!(add_app(db, "other", Some(String::new())).await.is_err());
    }
}
