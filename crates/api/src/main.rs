use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skudesk_api::auth::password::hash_password;
use skudesk_api::broadcast::Broadcaster;
use skudesk_api::config::ServerConfig;
use skudesk_api::router::build_app_router;
use skudesk_api::state::AppState;
use skudesk_api::ws;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skudesk_api=debug,skudesk_store=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- State ---
    let state = AppState::new(config.clone());

    state
        .uploads
        .ensure()
        .await
        .expect("Failed to create uploads directory");
    tracing::info!(dir = %config.uploads_dir.display(), "Uploads directory ready");

    // --- Admin credential ---
    let password_hash =
        hash_password(&config.admin_password).expect("Failed to hash admin password");
    state
        .credentials
        .reset_admin(&config.admin_username, &password_hash)
        .await
        .expect("Failed to write admin credential");

    // --- Heartbeat ---
    let heartbeat_handle = ws::start_heartbeat(Arc::clone(&state.ws_manager));

    // --- Broadcaster (catalog events -> WebSocket clients) ---
    let broadcast_cancel = CancellationToken::new();
    let broadcaster = Broadcaster::new(Arc::clone(&state.ws_manager));
    let broadcast_handle = tokio::spawn(
        broadcaster.run(state.event_bus.subscribe(), broadcast_cancel.clone()),
    );
    tracing::info!("Broadcaster started");

    let ws_manager = Arc::clone(&state.ws_manager);

    // --- Router ---
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

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    broadcast_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), broadcast_handle).await;
    tracing::info!("Broadcaster stopped");

    let ws_count = ws_manager.connection_count().await;
    tracing::info!(ws_count, "Closing remaining WebSocket connections");
    ws_manager.shutdown_all().await;

    heartbeat_handle.abort();
    tracing::info!("Heartbeat task stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
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
