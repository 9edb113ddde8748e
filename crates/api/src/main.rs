use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use soapbridge_api::config::ServerConfig;
use soapbridge_api::router::build_app_router;
use soapbridge_api::state::AppState;
use soapbridge_connector::{
    register_builtins, Connector, ConnectorConfig, ScriptCatalog, UnroutedDispatcher,
};
use soapbridge_samples::{register_all, StoreSettings};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "soapbridge_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let connector_config = ConnectorConfig::from_env();
    tracing::info!(
        save_path = %connector_config.transaction_save_path.display(),
        soap_timeout_ms = connector_config.soap_request_timeout.as_millis() as u64,
        "Loaded connector configuration"
    );

    // --- Script catalog ---
    let mut catalog = ScriptCatalog::new();
    register_all(&mut catalog, StoreSettings::default());
    register_builtins(&mut catalog);
    tracing::info!(scripts = catalog.len(), "Script catalog built");

    // --- Connector ---
    // No backend route is configured for the standalone server; scripts
    // that call out will fault until a real dispatcher is wired in.
    let connector = Arc::new(Connector::new(
        catalog,
        connector_config,
        Arc::new(UnroutedDispatcher),
    ));
    tracing::warn!("Outbound SOAP dispatch is unrouted");

    // --- App state & router ---
    let state = AppState {
        connector,
        config: Arc::new(config.clone()),
    };
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server shuts
/// down cleanly whether stopped interactively or by a process manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
