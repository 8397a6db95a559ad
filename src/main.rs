//! Application entry point.

use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use secrecy::ExposeSecret;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use mirror_rosetta::api::create_router;
use mirror_rosetta::app::{
    AppState, Config, DatabaseHealthCheck, LogFormat, NetworkHealthCheck,
};
use mirror_rosetta::domain::{DatabaseClient, HealthCheck};
use mirror_rosetta::infra::{PostgresClient, PostgresConfig, RosettaHttpClient};

fn init_tracing(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug,sqlx=warn"));

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = Config::from_env().context("Invalid configuration")?;
    init_tracing(config.log_format);

    info!("Mirror Rosetta API v{}", env!("CARGO_PKG_VERSION"));
    info!(
        network = %config.network.network,
        online = config.network.online,
        "Serving network"
    );

    let postgres_client =
        PostgresClient::new(config.database_url.expose_secret(), PostgresConfig::default())
            .await?;
    postgres_client.run_migrations().await?;
    info!("Database connected and migrations applied");
    let db_client: Arc<dyn DatabaseClient> = Arc::new(postgres_client);

    // Readiness goes through the server's own API, so it needs the bound port.
    let self_client = RosettaHttpClient::localhost(config.port, config.health_check_timeout)?;
    let checks: Vec<Arc<dyn HealthCheck>> = vec![
        Arc::new(DatabaseHealthCheck::new(Arc::clone(&db_client))),
        Arc::new(NetworkHealthCheck::new(self_client)),
    ];

    let app_state = Arc::new(AppState::with_health_checks(
        db_client,
        config.network.clone(),
        checks,
        config.health_check_timeout,
    ));
    info!(
        checks = ?app_state.health.check_names(),
        "Readiness checks registered"
    );

    let router = create_router(app_state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server starting on http://{}", addr);
    info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
