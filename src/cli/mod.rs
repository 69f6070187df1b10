// CLI module for serving and administrative operations

pub mod admin;
pub mod app;
pub mod migrate;

use clap::{Parser, Subcommand};
use sea_orm::DatabaseConnection;

/// SSO backend CLI
#[derive(Parser)]
#[command(name = "sso-backend")]
#[command(about = "Single sign-on authentication backend", long_about = None)]
pub struct Cli {
    /// Path to an env file loaded before reading configuration
    #[arg(long, env = "CONFIG_PATH", global = true)]
    pub env_file: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Apply pending database migrations and exit
    Migrate,

    /// Registered application management
    #[command(subcommand)]
    App(AppCommands),

    /// Administrator flag management
    #[command(subcommand)]
    Admin(AdminCommands),
}

#[derive(Subcommand)]
pub enum AppCommands {
    /// Register a new application and print its id
    Add {
        /// Unique application name
        #[arg(long)]
        name: String,

        /// Signing secret; generated when omitted
        #[arg(long)]
        secret: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Grant administrator privileges to a user
    Grant {
        #[arg(long)]
        user_id: i64,
    },

    /// Revoke administrator privileges from a user
    Revoke {
        #[arg(long)]
        user_id: i64,
    },
}

/// Execute an administrative CLI command
///
/// `Serve` is handled by main and is a no-op here.
///
/// # Arguments
/// * `command` - Parsed subcommand
/// * `db` - Connected and migrated database
pub async fn execute_command(
    command: Commands,
    db: DatabaseConnection,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Serve => {}
        Commands::Migrate => migrate::run_migrations(&db).await?,
        Commands::App(AppCommands::Add { name, secret }) => {
            app::add_app(db, &name, secret).await?;
        }
        Commands::Admin(admin_cmd) => match admin_cmd {
            AdminCommands::Grant { user_id } => admin::set_admin(db, user_id, true).await?,
            AdminCommands::Revoke { user_id } => admin::set_admin(db, user_id, false).await?,
        },
    }

    Ok(())
}
