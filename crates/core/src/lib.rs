//! Pushwave domain types.
//!
//! - [`subscription`]: browser push subscriptions and their identity.
//! - [`credentials`]: VAPID key resolution from configuration.
//! - [`broadcast`]: request clamping and the per-wave payload.
//! - [`vapid`]: P-256 keypair generation.

pub mod broadcast;
pub mod credentials;
pub mod error;
pub mod subscription;
pub mod vapid;
