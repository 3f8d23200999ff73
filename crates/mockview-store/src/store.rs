//! Store interface used by the record lifecycle manager and listing views.

use crate::error::StoreError;
use crate::subscription::OwnerSubscription;
use async_trait::async_trait;
use mockview_protocol::{NewInterview, RecordId, RecordPatch, StoredInterview, UserId};

#[async_trait]
/// Keyed interview document collection.
pub trait InterviewStore: Send + Sync {
    /// Allocate a new document under a store-generated key and return the key.
    async fn create(&self, interview: NewInterview) -> Result<RecordId, StoreError>;

    /// Read a document by key.
    async fn get(&self, key: &RecordId) -> Result<Option<StoredInterview>, StoreError>;

    /// Merge a partial write into an existing document. Fails with
    /// `StoreError::NotFound` when the key has no document.
    async fn update(&self, key: &RecordId, patch: RecordPatch) -> Result<(), StoreError>;

    /// All documents whose `userId` equals `owner`, in key order.
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<StoredInterview>, StoreError>;

    /// Live query over the documents owned by `owner`. The subscription starts
    /// with the current snapshot and receives a fresh one after every write
    /// that touches that owner.
    fn watch_owner(&self, owner: &UserId) -> Result<OwnerSubscription, StoreError>;
}

/// Generate a fresh document key.
pub(crate) fn generate_key() -> RecordId {
    RecordId::new(uuid::Uuid::new_v4().simple().to_string())
}
