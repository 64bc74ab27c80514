//! Outbound push delivery channels.
//!
//! [`PushSender`] is the seam between the broadcast engine and the push
//! protocol: one call is one delivery attempt to one subscription.

pub mod webpush;

use async_trait::async_trait;
use pushwave_core::subscription::Subscription;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for a single delivery attempt.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    /// Signing or encrypting the message failed.
    #[error("Failed to build push message: {0}")]
    Message(#[from] web_push::WebPushError),

    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The configured VAPID private key is not a raw base64url P-256 scalar.
    #[error("VAPID private key is not a base64url 32-byte P-256 scalar")]
    InvalidPrivateKey,

    /// The push service returned a non-2xx status code.
    #[error("Push service returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// PushSender
// ---------------------------------------------------------------------------

/// Sends one serialized payload to one subscription.
#[async_trait]
pub trait PushSender: Send + Sync {
    async fn send(&self, subscription: &Subscription, payload: &[u8]) -> Result<(), PushError>;
}
