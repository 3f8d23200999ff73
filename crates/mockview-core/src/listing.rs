//! Live dashboard listing of a user's interviews.

use mockview_protocol::{StoredInterview, UserId};
use mockview_store::{InterviewStore, OwnerSubscription, StoreError};
use tokio_stream::{Stream, StreamExt};

/// What the dashboard currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingState {
    /// No snapshot has been received yet.
    Loading,
    /// Owner's records, newest first.
    Ready(Vec<StoredInterview>),
}

/// Live view over the interviews owned by one user.
///
/// Entries are keyed by store key rather than the stamped `id`, so a record
/// whose id-stamping write has not landed yet is still listed.
pub struct InterviewListing {
    subscription: OwnerSubscription,
    state: ListingState,
}

impl InterviewListing {
    /// Start watching `owner`'s records. The listing is `Loading` until
    /// [`InterviewListing::next`] is first awaited.
    pub fn subscribe(store: &dyn InterviewStore, owner: &UserId) -> Result<Self, StoreError> {
        Ok(Self {
            subscription: store.watch_owner(owner)?,
            state: ListingState::Loading,
        })
    }

    pub fn owner(&self) -> &UserId {
        self.subscription.owner()
    }

    pub fn state(&self) -> &ListingState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ListingState::Loading)
    }

    /// Records currently shown; empty while loading.
    pub fn records(&self) -> &[StoredInterview] {
        match &self.state {
            ListingState::Loading => &[],
            ListingState::Ready(records) => records,
        }
    }

    /// Advance to the next snapshot: the current one on the first call, then
    /// whatever the store publishes next.
    pub async fn next(&mut self) -> Result<&[StoredInterview], StoreError> {
        let snapshot = if self.is_loading() {
            self.subscription.current()
        } else {
            self.subscription.changed().await?
        };
        self.state = ListingState::Ready(newest_first(snapshot));
        Ok(self.records())
    }

    /// Every snapshot as a stream, starting with the current one.
    pub fn into_stream(self) -> impl Stream<Item = Vec<StoredInterview>> {
        self.subscription.into_stream().map(newest_first)
    }
}

/// Sort by `createdAt` descending, ties broken by key.
pub fn newest_first(mut records: Vec<StoredInterview>) -> Vec<StoredInterview> {
    records.sort_by(|a, b| {
        b.record
            .created_at
            .cmp(&a.record.created_at)
            .then_with(|| a.key.cmp(&b.key))
    });
    records
}
