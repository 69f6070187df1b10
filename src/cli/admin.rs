// Administrator flag CLI commands

use sea_orm::DatabaseConnection;

use crate::stores::UserStore;
use crate::types::internal::context::RequestContext;

/// Grant or revoke administrator privileges for a user
pub async fn set_admin(
    db: DatabaseConnection,
    user_id: i64,
    is_admin: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = RequestContext::for_cli("admin_set");

    UserStore::new(db).set_admin(user_id, is_admin).await?;

    tracing::info!(request_id = %ctx.request_id, user_id, is_admin, "Administrator flag updated");
    if is_admin {
        println!("✅ User {} is now an administrator", user_id);
    } else {
        println!("✅ User {} is no longer an administrator", user_id);
    }

    Ok(())
}
