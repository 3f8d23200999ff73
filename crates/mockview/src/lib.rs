//! Public SDK surface for mockview.
//!
//! Re-exports the building blocks and provides a small initialization helper
//! to keep consumer setup consistent.

/// Re-export for convenience.
pub use mockview_config as config;
pub use mockview_core as core;
/// Re-export for convenience.
pub use mockview_protocol as protocol;
pub use mockview_store as store;

use mockview_config::{MockviewConfig, StoreProvider};
use mockview_store::{FileInterviewStore, InterviewStore, MemoryInterviewStore, StoreError};
use std::path::Path;
use std::sync::Arc;

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::builder()
            .format_timestamp_millis()
            .parse_default_env()
            .try_init();
    }
}

/// Open the store selected by `config.store`. A relative file store path is
/// resolved against `base`.
pub fn open_store(
    config: &MockviewConfig,
    base: &Path,
) -> Result<Arc<dyn InterviewStore>, StoreError> {
    match config.store.provider {
        StoreProvider::Memory => Ok(Arc::new(MemoryInterviewStore::new())),
        StoreProvider::File => {
            let path = base.join(config.store.resolved_path());
            Ok(Arc::new(FileInterviewStore::new(path)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::open_store;
    use mockview_config::{MockviewConfig, StoreConfig, StoreProvider};
    use mockview_protocol::UserId;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn memory_store_is_selected_from_config() {
        let config = MockviewConfig {
            store: StoreConfig {
                provider: StoreProvider::Memory,
                path: None,
            },
            ..MockviewConfig::default()
        };
        let store = open_store(&config, std::path::Path::new(".")).expect("store");
        let listed = store
            .list_by_owner(&UserId::from("nobody"))
            .await
            .expect("list");
        assert_eq!(listed, Vec::new());
    }
}
