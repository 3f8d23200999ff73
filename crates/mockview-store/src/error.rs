//! Error types for store operations.

use mockview_protocol::RecordId;

/// Errors returned by interview stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Update targeted a key with no document.
    #[error("no document with key {0}")]
    NotFound(RecordId),
    /// Key cannot address a document (empty or contains path components).
    #[error("invalid document key: {0:?}")]
    InvalidKey(String),
    /// Backend rejected or failed the operation.
    #[error("store backend error: {0}")]
    Backend(String),
    /// The live query was torn down by the store.
    #[error("subscription closed")]
    SubscriptionClosed,
}
