use std::sync::Arc;

use clap::Parser;
use poem::{listener::TcpListener, middleware::Tracing, EndpointExt, Route, Server};
use poem_openapi::OpenApiService;

use sso_backend::api::{AuthApi, HealthApi};
use sso_backend::app_data::AppData;
use sso_backend::cli::{self, Cli, Commands};
use sso_backend::config::{connect_database, init_logging, migrate_database, Settings, SystemEnvironment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load the env file before any setting is read
    let env = SystemEnvironment::load(cli.env_file.as_deref())?;
    let settings = Settings::from_env_provider(Arc::new(env))?;

    init_logging(settings.logging())?;
    tracing::info!(env = ?settings.env(), "Configuration loaded");

    let db = connect_database(settings.database_url()).await?;
    migrate_database(&db).await?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(db, &settings).await,
        command => cli::execute_command(command, db).await,
    }
}

async fn serve(
    db: sea_orm::DatabaseConnection,
    settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    let app_data = Arc::new(AppData::init(db, settings)?);

    let address = settings.server_address();
    let api_service = OpenApiService::new(
        (HealthApi, AuthApi::new(app_data)),
        "SSO Authentication API",
        env!("CARGO_PKG_VERSION"),
    )
    .server(format!("http://{}/api", address));

    let ui = api_service.swagger_ui();

    let app = Route::new()
        .nest("/api", api_service)
        .nest("/swagger", ui)
        .with(Tracing);

    tracing::info!("Starting server on http://{}", address);
    tracing::info!("Swagger UI available at http://{}/swagger", address);

    Server::new(TcpListener::bind(address))
        .run_with_graceful_shutdown(app, shutdown_signal(), None)
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
