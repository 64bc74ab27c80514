//! Multi-wave broadcast dispatch.
//!
//! [`BroadcastDispatcher`] snapshots the subscription registry once, then
//! runs `wave_count` sequential waves. Each wave fans out concurrently to
//! every subscription in the snapshot and waits for all attempts to settle
//! before pausing and starting the next. Individual delivery failures are
//! logged and counted, never propagated.

use std::sync::Arc;
use std::time::Duration;

use pushwave_core::broadcast::{BroadcastLimits, BroadcastRequest, NotificationPayload};
use pushwave_core::error::CoreError;
use pushwave_core::subscription::Subscription;
use pushwave_db::{StoreError, SubscriptionStore};
use tokio_util::sync::CancellationToken;

use crate::delivery::PushSender;

// ---------------------------------------------------------------------------
// Error / report
// ---------------------------------------------------------------------------

/// Reasons a broadcast does not start.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The registry is empty ([`CoreError::NoSubscribers`]).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The registry could not be read.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The payload could not be serialized.
    #[error("Failed to serialize notification payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Outcome of a broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Waves actually executed. Less than the requested count only when
    /// the broadcast was cancelled.
    pub waves_sent: u32,
    /// Effective pause between waves.
    pub interval_ms: u64,
    /// Successful delivery attempts across all waves.
    pub delivered: usize,
    /// Failed delivery attempts across all waves.
    pub failed: usize,
}

// ---------------------------------------------------------------------------
// BroadcastDispatcher
// ---------------------------------------------------------------------------

/// Runs broadcasts against the subscription registry.
pub struct BroadcastDispatcher {
    store: Arc<SubscriptionStore>,
    sender: Arc<dyn PushSender>,
    limits: BroadcastLimits,
}

impl BroadcastDispatcher {
    pub fn new(
        store: Arc<SubscriptionStore>,
        sender: Arc<dyn PushSender>,
        limits: BroadcastLimits,
    ) -> Self {
        Self {
            store,
            sender,
            limits,
        }
    }

    /// Bounds applied when building a [`BroadcastRequest`].
    pub fn limits(&self) -> &BroadcastLimits {
        &self.limits
    }

    /// Execute every wave of `request`.
    ///
    /// Fails with [`CoreError::NoSubscribers`] before any delivery when the
    /// registry is empty. Once waves start the call only returns `Ok`.
    ///
    /// When `cancel` fires, the wave in flight settles and the remaining
    /// waves are skipped.
    pub async fn broadcast(
        &self,
        request: &BroadcastRequest,
        cancel: &CancellationToken,
    ) -> Result<BroadcastReport, DispatchError> {
        let subscriptions = self.store.enumerate().await?;
        if subscriptions.is_empty() {
            return Err(CoreError::NoSubscribers.into());
        }

        let interval = Duration::from_millis(request.interval_ms);
        let mut report = BroadcastReport {
            waves_sent: 0,
            interval_ms: request.interval_ms,
            delivered: 0,
            failed: 0,
        };

        tracing::info!(
            waves = request.wave_count,
            interval_ms = request.interval_ms,
            subscriptions = subscriptions.len(),
            "Starting broadcast"
        );

        for index in 1..=request.wave_count {
            let payload = NotificationPayload::for_wave(request, index);
            let body = serde_json::to_vec(&payload)?;

            let (delivered, failed) = self.run_wave(&subscriptions, &body).await;
            report.waves_sent = index;
            report.delivered += delivered;
            report.failed += failed;

            tracing::debug!(
                index,
                total = request.wave_count,
                nonce = %payload.nonce,
                delivered,
                failed,
                "Wave settled"
            );

            if index == request.wave_count {
                break;
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::warn!(
                        waves_sent = report.waves_sent,
                        waves_requested = request.wave_count,
                        "Broadcast cancelled, skipping remaining waves"
                    );
                    break;
                }
                _ = tokio::time::sleep(interval) => {}
            }
        }

        tracing::info!(
            waves_sent = report.waves_sent,
            delivered = report.delivered,
            failed = report.failed,
            "Broadcast finished"
        );

        Ok(report)
    }

    /// Deliver `body` to every subscription concurrently and wait for all
    /// attempts. Returns `(delivered, failed)`.
    async fn run_wave(&self, subscriptions: &[Subscription], body: &[u8]) -> (usize, usize) {
        let attempts = subscriptions.iter().map(|subscription| async move {
            match self.sender.send(subscription, body).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(
                        endpoint = %subscription.endpoint,
                        error = %e,
                        "Push delivery failed"
                    );
                    false
                }
            }
        });

        let results = futures::future::join_all(attempts).await;
        let delivered = results.iter().filter(|ok| **ok).count();
        (delivered, results.len() - delivered)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
