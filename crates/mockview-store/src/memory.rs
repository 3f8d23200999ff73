//! In-process interview store.

use crate::clock::{Clock, SystemClock};
use crate::error::StoreError;
use crate::store::{InterviewStore, generate_key};
use crate::subscription::{OwnerSubscription, SubscriptionHub};
use async_trait::async_trait;
use log::{debug, info};
use mockview_protocol::{
    InterviewRecord, NewInterview, RecordId, RecordPatch, StoredInterview, UserId,
};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Store keeping every document in a process-local map.
pub struct MemoryInterviewStore {
    documents: RwLock<BTreeMap<RecordId, InterviewRecord>>,
    hub: SubscriptionHub,
    clock: Arc<dyn Clock>,
}

impl Default for MemoryInterviewStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryInterviewStore {
    /// Empty store on the wall clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Empty store resolving server timestamps with `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            documents: RwLock::new(BTreeMap::new()),
            hub: SubscriptionHub::new(),
            clock,
        }
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    fn snapshot(&self, owner: &UserId) -> Vec<StoredInterview> {
        owner_snapshot(&self.documents.read(), owner)
    }

    /// Publish fresh snapshots for `owners`. Callers hold the documents lock
    /// so publishes land in write order.
    fn notify(&self, documents: &BTreeMap<RecordId, InterviewRecord>, owners: &[&UserId]) {
        for (idx, owner) in owners.iter().enumerate() {
            if owners[..idx].contains(owner) || !self.hub.is_watched(owner) {
                continue;
            }
            self.hub.publish(owner, owner_snapshot(documents, owner));
        }
    }
}

fn owner_snapshot(
    documents: &BTreeMap<RecordId, InterviewRecord>,
    owner: &UserId,
) -> Vec<StoredInterview> {
    documents
        .iter()
        .filter(|(_, record)| &record.user_id == owner)
        .map(|(key, record)| StoredInterview {
            key: key.clone(),
            record: record.clone(),
        })
        .collect()
}

#[async_trait]
impl InterviewStore for MemoryInterviewStore {
    async fn create(&self, interview: NewInterview) -> Result<RecordId, StoreError> {
        let key = generate_key();
        let record = interview.into_record(self.clock.now());
        let owner = record.user_id.clone();
        let mut documents = self.documents.write();
        documents.insert(key.clone(), record);
        info!("allocated interview document (key={}, owner={})", key, owner);
        self.notify(&documents, &[&owner]);
        Ok(key)
    }

    async fn get(&self, key: &RecordId) -> Result<Option<StoredInterview>, StoreError> {
        Ok(self
            .documents
            .read()
            .get(key)
            .cloned()
            .map(|record| StoredInterview {
                key: key.clone(),
                record,
            }))
    }

    async fn update(&self, key: &RecordId, patch: RecordPatch) -> Result<(), StoreError> {
        let mut documents = self.documents.write();
        let record = documents
            .get_mut(key)
            .ok_or_else(|| StoreError::NotFound(key.clone()))?;
        let previous_owner = record.user_id.clone();
        record.apply(&patch, self.clock.now());
        let owner = record.user_id.clone();
        debug!("updated interview document (key={})", key);
        self.notify(&documents, &[&previous_owner, &owner]);
        Ok(())
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<StoredInterview>, StoreError> {
        Ok(self.snapshot(owner))
    }

    fn watch_owner(&self, owner: &UserId) -> Result<OwnerSubscription, StoreError> {
        let documents = self.documents.read();
        Ok(self
            .hub
            .subscribe(owner.clone(), owner_snapshot(&documents, owner)))
    }
}
