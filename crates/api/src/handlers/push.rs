//! Handlers for the push API: client config, subscription registration and
//! broadcast.
//!
//! There is no authentication on any of these routes. The operator UI is a
//! trusted tool.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use pushwave_core::broadcast::{coerce_number, BroadcastRequest};
use pushwave_core::subscription::SubscriptionPayload;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::parse_json_body;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Response for `GET /api/config`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// `applicationServerKey` for `pushManager.subscribe()`.
    pub public_vapid_key: String,
    pub default_interval_ms: u64,
    pub max_send_count: u32,
}

/// Response for `POST /api/subscribe`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeResponse {
    pub success: bool,
    pub subscription_count: usize,
}

/// Body of `POST /api/send`. Every field is optional.
///
/// `count` and `intervalMs` are loosely typed: numbers and numeric strings
/// are accepted, anything else falls back to the default.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    pub title: Option<String>,
    pub message: Option<String>,
    pub count: Option<serde_json::Value>,
    pub interval_ms: Option<serde_json::Value>,
}

/// Response for `POST /api/send`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResponse {
    pub success: bool,
    /// Waves executed.
    pub sent: u32,
    /// Effective wave count after clamping.
    pub count: u32,
    /// Effective interval after clamping.
    pub interval_ms: u64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/config
pub async fn get_config(State(state): State<AppState>) -> Json<ClientConfig> {
    let limits = &state.config.push.limits;
    Json(ClientConfig {
        public_vapid_key: state.credentials.public_key.clone(),
        default_interval_ms: limits.default_interval_ms,
        max_send_count: limits.max_send_count,
    })
}

/// POST /api/subscribe
///
/// Registers the subscription unless an identical one is already stored.
/// Returns 201 with the current total either way.
pub async fn subscribe(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<(StatusCode, Json<SubscribeResponse>)> {
    let payload: SubscriptionPayload = parse_json_body(&body)?;
    let subscription = payload.into_subscription()?;

    let outcome = state.store.insert(subscription).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubscribeResponse {
            success: true,
            subscription_count: outcome.total_count,
        }),
    ))
}

/// POST /api/send
///
/// Runs the whole broadcast before responding. The broadcast runs on its own
/// task: if the client goes away or the server shuts down, the wave in flight
/// settles and the remaining waves are skipped.
pub async fn send(State(state): State<AppState>, body: Bytes) -> AppResult<Json<SendResponse>> {
    let input: SendRequest = parse_json_body(&body)?;

    let request = BroadcastRequest::new(
        input.title,
        input.message,
        input.count.as_ref().and_then(coerce_number),
        input.interval_ms.as_ref().and_then(coerce_number),
        state.dispatcher.limits(),
    );

    let cancel = state.shutdown.child_token();
    let _guard = cancel.clone().drop_guard();
    let dispatcher = Arc::clone(&state.dispatcher);
    let task_request = request.clone();

    let report = tokio::spawn(async move { dispatcher.broadcast(&task_request, &cancel).await })
        .await
        .map_err(|e| AppError::InternalError(format!("Broadcast task failed: {e}")))??;

    Ok(Json(SendResponse {
        success: true,
        sent: report.waves_sent,
        count: request.wave_count,
        interval_ms: report.interval_ms,
    }))
}
