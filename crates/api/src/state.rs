use std::sync::Arc;

use pushwave_core::credentials::VapidCredentials;
use pushwave_db::SubscriptionStore;
use pushwave_events::BroadcastDispatcher;
use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// VAPID credentials resolved at startup. Read-only.
    pub credentials: Arc<VapidCredentials>,
    /// Subscription registry.
    pub store: Arc<SubscriptionStore>,
    /// Broadcast engine (shares `store`).
    pub dispatcher: Arc<BroadcastDispatcher>,
    /// Cancelled on server shutdown; in-flight broadcasts stop after their
    /// current wave.
    pub shutdown: CancellationToken,
}
