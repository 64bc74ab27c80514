//! File-backed [`SubscriptionStore`].

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use pushwave_core::subscription::Subscription;
use tokio::sync::Mutex;

use crate::error::StoreError;

/// Result of [`SubscriptionStore::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertOutcome {
    /// `false` when an identical subscription was already stored.
    pub accepted: bool,
    /// Number of stored subscriptions after the call.
    pub total_count: usize,
}

/// Ordered, de-duplicated collection of push subscriptions persisted as a
/// JSON array.
///
/// Designed to be wrapped in `Arc` and shared across handlers. Every
/// read-modify-write runs under `write_lock`, so concurrent inserts on one
/// process cannot lose updates. Running several processes against the same
/// file is not supported.
#[derive(Debug)]
pub struct SubscriptionStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl SubscriptionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every stored subscription in insertion order.
    ///
    /// A missing file is an empty registry. Valid JSON that is not an array
    /// is also treated as empty.
    pub async fn enumerate(&self) -> Result<Vec<Subscription>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let parsed: serde_json::Value =
            serde_json::from_str(&content).map_err(|source| self.corrupt(source))?;

        if !parsed.is_array() {
            tracing::warn!(
                path = %self.path.display(),
                "Subscription store does not hold a JSON array, treating as empty"
            );
            return Ok(Vec::new());
        }

        serde_json::from_value(parsed).map_err(|source| self.corrupt(source))
    }

    /// Insert `candidate` unless an identical subscription is already stored.
    ///
    /// Returns [`StoreError::Core`] with an invalid-subscription error when
    /// the endpoint or either key is empty.
    pub async fn insert(&self, candidate: Subscription) -> Result<InsertOutcome, StoreError> {
        candidate.validate()?;

        let _guard = self.write_lock.lock().await;

        let mut subscriptions = self.enumerate().await?;
        let identity = candidate.identity();

        if subscriptions.iter().any(|s| s.identity() == identity) {
            tracing::debug!(endpoint = %candidate.endpoint, "Subscription already registered");
            return Ok(InsertOutcome {
                accepted: false,
                total_count: subscriptions.len(),
            });
        }

        subscriptions.push(candidate);
        self.save(&subscriptions).await?;

        tracing::info!(
            total = subscriptions.len(),
            "Registered new push subscription"
        );

        Ok(InsertOutcome {
            accepted: true,
            total_count: subscriptions.len(),
        })
    }

    /// Overwrite the whole file. Writes a sibling temp file and renames it
    /// into place so readers never observe a partial array.
    async fn save(&self, subscriptions: &[Subscription]) -> Result<(), StoreError> {
        let json =
            serde_json::to_string_pretty(subscriptions).map_err(|source| self.corrupt(source))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| self.io(source))?;
        }

        let tmp_path = self.tmp_path();
        tokio::fs::write(&tmp_path, json)
            .await
            .map_err(|source| self.io(source))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|source| self.io(source))?;

        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "subscriptions.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn corrupt(&self, source: serde_json::Error) -> StoreError {
        StoreError::Corrupt {
            path: self.path.clone(),
            source,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
