use std::path::PathBuf;

use pushwave_core::broadcast::{BroadcastLimits, DEFAULT_INTERVAL_MS, DEFAULT_MAX_SEND_COUNT};
use pushwave_core::credentials::DEFAULT_CONTACT;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// VAPID keys are resolved separately (see
/// [`pushwave_core::credentials::VapidCredentials::resolve`]).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`). Broadcasts are exempt.
    pub request_timeout_secs: u64,
    /// Location of the subscription registry file.
    pub subscriptions_path: PathBuf,
    /// Push signing and broadcast settings.
    pub push: PushConfig,
}

/// Push-specific settings.
#[derive(Debug, Clone)]
pub struct PushConfig {
    /// VAPID `sub` claim, a `mailto:` or `https:` URI.
    pub contact: String,
    /// Wave count cap and default interval.
    pub limits: BroadcastLimits,
    /// Log both VAPID keys at startup.
    ///
    /// On by default. The private key ends up in the logs, so turn this off
    /// anywhere logs are shipped or retained.
    pub log_vapid_keys: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                     |
    /// |------------------------|-----------------------------|
    /// | `HOST`                 | `0.0.0.0`                   |
    /// | `PORT`                 | `3000`                      |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`     |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                        |
    /// | `SUBSCRIPTIONS_PATH`   | `subscriptions.json`        |
    /// | `VAPID_CONTACT_EMAIL`  | `mailto:admin@example.com`  |
    /// | `MAX_SEND_COUNT`       | `20`                        |
    /// | `DEFAULT_INTERVAL_MS`  | `1000`                      |
    /// | `LOG_VAPID_KEYS`       | `true`                      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let subscriptions_path = std::env::var("SUBSCRIPTIONS_PATH")
            .unwrap_or_else(|_| "subscriptions.json".into())
            .into();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            subscriptions_path,
            push: PushConfig::from_env(),
        }
    }
}

impl PushConfig {
    pub fn from_env() -> Self {
        let contact = std::env::var("VAPID_CONTACT_EMAIL")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_CONTACT.to_string());

        let max_send_count: u32 = std::env::var("MAX_SEND_COUNT")
            .map(|v| v.parse().expect("MAX_SEND_COUNT must be a valid u32"))
            .unwrap_or(DEFAULT_MAX_SEND_COUNT);

        let default_interval_ms: u64 = std::env::var("DEFAULT_INTERVAL_MS")
            .map(|v| v.parse().expect("DEFAULT_INTERVAL_MS must be a valid u64"))
            .unwrap_or(DEFAULT_INTERVAL_MS);

        let log_vapid_keys = std::env::var("LOG_VAPID_KEYS")
            .map(|v| parse_flag(&v))
            .unwrap_or(true);

        Self {
            contact,
            limits: BroadcastLimits {
                max_send_count,
                default_interval_ms,
            },
            log_vapid_keys,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
