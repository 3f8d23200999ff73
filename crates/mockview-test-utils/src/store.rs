use async_trait::async_trait;
use mockview_protocol::{NewInterview, RecordId, RecordPatch, StoredInterview, UserId};
use mockview_store::{InterviewStore, OwnerSubscription, StoreError};
use parking_lot::Mutex;
use std::sync::Arc;

/// A write observed by [`RecordingStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    Create(NewInterview),
    Update(RecordId, RecordPatch),
}

/// Store wrapper recording every write, optionally failing the n-th one.
pub struct RecordingStore {
    inner: Arc<dyn InterviewStore>,
    ops: Mutex<Vec<StoreOp>>,
    fail_on_write: Mutex<Option<usize>>,
}

impl RecordingStore {
    pub fn new(inner: Arc<dyn InterviewStore>) -> Self {
        Self {
            inner,
            ops: Mutex::new(Vec::new()),
            fail_on_write: Mutex::new(None),
        }
    }

    /// Fail the write with 1-based index `n` (counting from now on, across
    /// creates and updates) with a backend error. The failed write is still
    /// recorded.
    pub fn fail_on_write(&self, n: usize) {
        let attempted = self.ops.lock().len();
        *self.fail_on_write.lock() = Some(attempted + n);
    }

    pub fn ops(&self) -> Vec<StoreOp> {
        self.ops.lock().clone()
    }

    pub fn write_count(&self) -> usize {
        self.ops.lock().len()
    }

    fn record(&self, op: StoreOp) -> Result<(), StoreError> {
        let mut ops = self.ops.lock();
        ops.push(op);
        if *self.fail_on_write.lock() == Some(ops.len()) {
            return Err(StoreError::Backend("injected write failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl InterviewStore for RecordingStore {
    async fn create(&self, interview: NewInterview) -> Result<RecordId, StoreError> {
        self.record(StoreOp::Create(interview.clone()))?;
        self.inner.create(interview).await
    }

    async fn get(&self, key: &RecordId) -> Result<Option<StoredInterview>, StoreError> {
        self.inner.get(key).await
    }

    async fn update(&self, key: &RecordId, patch: RecordPatch) -> Result<(), StoreError> {
        self.record(StoreOp::Update(key.clone(), patch.clone()))?;
        self.inner.update(key, patch).await
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<StoredInterview>, StoreError> {
        self.inner.list_by_owner(owner).await
    }

    fn watch_owner(&self, owner: &UserId) -> Result<OwnerSubscription, StoreError> {
        self.inner.watch_owner(owner)
    }
}
