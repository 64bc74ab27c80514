//! Durable subscription registry.
//!
//! The registry is a single JSON array on disk. There is no in-memory cache:
//! every call re-reads the file, so readers always see the last successful
//! write.

pub mod error;
pub mod subscription_store;

pub use error::StoreError;
pub use subscription_store::{InsertOutcome, SubscriptionStore};
