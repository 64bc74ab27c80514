//! Startup diagnostics for VAPID credentials.
//!
//! SECURITY: with `LOG_VAPID_KEYS` on (the default) the private key is
//! written to the log at startup. This is existing, relied-upon behaviour
//! for operators copying keys out of the first boot.

use pushwave_core::credentials::{CredentialError, VapidCredentials, VapidKeyInputs, ACCEPTED_SHAPES};
use pushwave_core::vapid;

use crate::config::PushConfig;

/// Resolve credentials from the environment, logging the outcome.
///
/// On failure the accepted configuration shapes are logged at error level;
/// the caller is expected to exit.
pub fn resolve_credentials(
    inputs: &VapidKeyInputs,
    push: &PushConfig,
) -> Result<VapidCredentials, CredentialError> {
    match VapidCredentials::resolve(inputs, push.contact.clone()) {
        Ok(credentials) => {
            log_credentials(&credentials, push.log_vapid_keys);
            Ok(credentials)
        }
        Err(e) => {
            tracing::error!(error = %e, "Missing VAPID keys in environment");
            for (n, shape) in ACCEPTED_SHAPES.iter().enumerate() {
                tracing::error!("Use {}) {shape}", n + 1);
            }
            tracing::error!("Generate keys with: generate-vapid-keys");
            Err(e)
        }
    }
}

fn log_credentials(credentials: &VapidCredentials, log_keys: bool) {
    tracing::info!(source = %credentials.source, contact = %credentials.contact, "VAPID key source");

    if log_keys {
        tracing::info!("VAPID_PUBLIC_KEY={}", credentials.public_key);
        tracing::info!("VAPID_PRIVATE_KEY={}", credentials.private_key);
    }

    if !vapid::is_valid_public_key(&credentials.public_key) {
        tracing::warn!("VAPID public key is not a base64url 65-byte P-256 point; browsers will reject it");
    }
    if !vapid::is_valid_private_key(&credentials.private_key) {
        tracing::warn!("VAPID private key is not a base64url 32-byte P-256 scalar; every delivery will fail");
    }
}
