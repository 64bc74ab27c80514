/// Domain-level errors shared by the registry, dispatch engine and API.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid subscription payload: {0}")]
    InvalidSubscription(String),

    #[error("No subscriptions saved yet.")]
    NoSubscribers,
}
