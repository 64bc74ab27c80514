use std::net::SocketAddr;
use std::sync::Arc;

use pushwave_core::credentials::VapidKeyInputs;
use pushwave_db::SubscriptionStore;
use pushwave_events::{BroadcastDispatcher, WebPushDelivery};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pushwave_api::config::ServerConfig;
use pushwave_api::router::build_app_router;
use pushwave_api::startup;
use pushwave_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "pushwave_api=debug,pushwave_events=debug,pushwave_db=debug,tower_http=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        subscriptions_path = %config.subscriptions_path.display(),
        max_send_count = config.push.limits.max_send_count,
        default_interval_ms = config.push.limits.default_interval_ms,
        "Loaded server configuration"
    );

    // --- VAPID credentials (fatal if missing) ---
    let credentials = match startup::resolve_credentials(&VapidKeyInputs::from_env(), &config.push)
    {
        Ok(credentials) => Arc::new(credentials),
        Err(_) => std::process::exit(1),
    };

    // --- Registry + dispatch ---
    let store = Arc::new(SubscriptionStore::new(config.subscriptions_path.clone()));

    let delivery =
        WebPushDelivery::new(Arc::clone(&credentials)).expect("Failed to build push HTTP client");
    let dispatcher = Arc::new(BroadcastDispatcher::new(
        Arc::clone(&store),
        Arc::new(delivery),
        config.push.limits,
    ));

    // --- App state ---
    let shutdown = CancellationToken::new();
    let state = AppState {
        config: Arc::new(config.clone()),
        credentials,
        store,
        dispatcher,
        shutdown: shutdown.clone(),
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
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            // Stop in-flight broadcasts after their current wave.
            shutdown.cancel();
        })
        .await
        .expect("Server error");

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
