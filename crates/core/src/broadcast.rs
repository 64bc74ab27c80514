//! Broadcast request clamping and the per-wave notification payload.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Lower bound for the pause between waves.
pub const MIN_INTERVAL_MS: u64 = 100;

/// Default upper bound on waves per broadcast (`MAX_SEND_COUNT`).
pub const DEFAULT_MAX_SEND_COUNT: u32 = 20;

/// Default pause between waves (`DEFAULT_INTERVAL_MS`).
pub const DEFAULT_INTERVAL_MS: u64 = 1000;

/// Title used when the request does not supply one.
pub const DEFAULT_TITLE: &str = "Background Notification";

/// Body used when the request does not supply one.
pub const DEFAULT_BODY: &str = "This is a reliable push message";

/// Configured bounds for broadcasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastLimits {
    pub max_send_count: u32,
    pub default_interval_ms: u64,
}

impl Default for BroadcastLimits {
    fn default() -> Self {
        Self {
            max_send_count: DEFAULT_MAX_SEND_COUNT,
            default_interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

/// A broadcast with its wave count and interval already clamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastRequest {
    pub title: String,
    pub body: String,
    pub wave_count: u32,
    pub interval_ms: u64,
}

impl BroadcastRequest {
    /// Build a request, normalizing out-of-range or non-numeric inputs.
    ///
    /// - count: missing, non-numeric or zero becomes 1, then
    ///   `min(max_send_count)`, then `max(1)`.
    /// - interval: missing, non-numeric or zero becomes the configured
    ///   default, then `max(MIN_INTERVAL_MS)`.
    ///
    /// Fractional values truncate toward zero after clamping, so `0.5` is a
    /// supplied interval and ends up at the floor. Nothing here ever fails.
    pub fn new(
        title: Option<String>,
        body: Option<String>,
        requested_count: Option<f64>,
        requested_interval_ms: Option<f64>,
        limits: &BroadcastLimits,
    ) -> Self {
        let count = supplied(requested_count).unwrap_or(1.0);
        let wave_count = count.min(f64::from(limits.max_send_count)).max(1.0) as u32;

        let interval = supplied(requested_interval_ms)
            .map(|v| v.max(0.0).min(u64::MAX as f64) as u64)
            .unwrap_or(limits.default_interval_ms);
        let interval_ms = interval.max(MIN_INTERVAL_MS);

        Self {
            title: title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            body: body.unwrap_or_else(|| DEFAULT_BODY.to_string()),
            wave_count,
            interval_ms,
        }
    }
}

/// Discard values that are absent, NaN or exactly zero. Anything else
/// counts as supplied and is clamped by the caller; the final integer cast
/// truncates toward zero.
fn supplied(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan() && *v != 0.0)
}

/// Coerce a loosely-typed JSON value into a number.
///
/// Accepts JSON numbers and numeric strings (surrounding whitespace allowed).
/// The only non-finite spellings accepted are `Infinity`, `+Infinity` and
/// `-Infinity`. Everything else, including `null`, yields `None`.
pub fn coerce_number(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => parse_numeric(s.trim()),
        _ => None,
    }
}

fn parse_numeric(s: &str) -> Option<f64> {
    match s {
        "Infinity" | "+Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        _ => s.parse::<f64>().ok().filter(|v| v.is_finite()),
    }
}

/// The JSON document delivered to every subscription in one wave.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    /// Unique per wave; the service worker uses it to de-duplicate.
    pub nonce: Uuid,
    pub sent_at: DateTime<Utc>,
    /// 1-based wave number.
    pub index: u32,
    pub total: u32,
}

impl NotificationPayload {
    /// Payload for wave `index` of `request`, stamped now with a fresh nonce.
    pub fn for_wave(request: &BroadcastRequest, index: u32) -> Self {
        Self {
            title: request.title.clone(),
            body: request.body.clone(),
            nonce: Uuid::new_v4(),
            sent_at: Utc::now(),
            index,
            total: request.wave_count,
        }
    }
}
