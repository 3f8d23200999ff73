//! Live owner queries built on `tokio::sync::watch`.

use crate::error::StoreError;
use log::debug;
use mockview_protocol::{StoredInterview, UserId};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// Handle on a live query returning every record owned by one user.
///
/// Each value is a complete snapshot; intermediate snapshots may be skipped
/// when several writes land before the subscriber looks again.
#[derive(Debug)]
pub struct OwnerSubscription {
    owner: UserId,
    receiver: watch::Receiver<Vec<StoredInterview>>,
}

impl OwnerSubscription {
    /// Owner this subscription filters on.
    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Latest snapshot, without waiting.
    pub fn current(&mut self) -> Vec<StoredInterview> {
        self.receiver.borrow_and_update().clone()
    }

    /// Wait for the next snapshot.
    pub async fn changed(&mut self) -> Result<Vec<StoredInterview>, StoreError> {
        self.receiver
            .changed()
            .await
            .map_err(|_| StoreError::SubscriptionClosed)?;
        Ok(self.receiver.borrow_and_update().clone())
    }

    /// Adapt into a stream yielding the current snapshot first, then every
    /// subsequent one.
    pub fn into_stream(self) -> WatchStream<Vec<StoredInterview>> {
        WatchStream::new(self.receiver)
    }
}

struct Subscriber {
    owner: UserId,
    sender: watch::Sender<Vec<StoredInterview>>,
}

/// Fan-out of owner snapshots to live subscriptions.
#[derive(Default)]
pub(crate) struct SubscriptionHub {
    subscribers: Mutex<Vec<Subscriber>>,
}

impl SubscriptionHub {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register a subscription seeded with `initial`.
    pub(crate) fn subscribe(
        &self,
        owner: UserId,
        initial: Vec<StoredInterview>,
    ) -> OwnerSubscription {
        let (sender, receiver) = watch::channel(initial);
        debug!("registered owner subscription (owner={})", owner);
        self.subscribers.lock().push(Subscriber {
            owner: owner.clone(),
            sender,
        });
        OwnerSubscription { owner, receiver }
    }

    /// Whether any live subscriber watches `owner`.
    pub(crate) fn is_watched(&self, owner: &UserId) -> bool {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|subscriber| !subscriber.sender.is_closed());
        subscribers.iter().any(|subscriber| &subscriber.owner == owner)
    }

    /// Push a new snapshot to every subscriber of `owner`.
    pub(crate) fn publish(&self, owner: &UserId, snapshot: Vec<StoredInterview>) {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|subscriber| !subscriber.sender.is_closed());
        let mut delivered = 0usize;
        for subscriber in subscribers.iter().filter(|s| &s.owner == owner) {
            subscriber.sender.send_replace(snapshot.clone());
            delivered += 1;
        }
        debug!(
            "published owner snapshot (owner={}, records={}, subscribers={})",
            owner,
            snapshot.len(),
            delivered
        );
    }
}
