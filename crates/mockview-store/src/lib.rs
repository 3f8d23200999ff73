//! Interview record persistence for mockview.
//!
//! The store is a keyed document collection: allocate under a generated key,
//! read by key, partially update by key, and watch every record owned by a
//! user. Timestamps written as `TimestampWrite::ServerNow` are resolved by the
//! store's `Clock` at commit time.

pub mod clock;
pub mod error;
pub mod file;
pub mod memory;
pub mod store;
pub mod subscription;

/// Store clock abstraction and the wall-clock default.
pub use clock::{Clock, SystemClock};
/// Store error type.
pub use error::StoreError;
/// JSON-file backed store.
pub use file::FileInterviewStore;
/// In-process store.
pub use memory::MemoryInterviewStore;
/// Store interface.
pub use store::InterviewStore;
/// Live owner queries.
pub use subscription::OwnerSubscription;
