//! File-backed interview store: one JSON document per key under a root
//! directory.

use crate::clock::{Clock, SystemClock};
use crate::error::StoreError;
use crate::store::{InterviewStore, generate_key};
use crate::subscription::{OwnerSubscription, SubscriptionHub};
use async_trait::async_trait;
use log::{debug, info, warn};
use mockview_protocol::{
    InterviewRecord, NewInterview, RecordId, RecordPatch, StoredInterview, UserId,
};
use parking_lot::Mutex;
use std::fs::{self, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const DOCUMENT_EXTENSION: &str = "json";

/// Store persisting each interview as `<root>/<key>.json`.
pub struct FileInterviewStore {
    root: PathBuf,
    /// Serializes writes together with the snapshots they publish.
    write_lock: Mutex<()>,
    hub: SubscriptionHub,
    clock: Arc<dyn Clock>,
}

impl FileInterviewStore {
    /// Open (creating if needed) a store under `root`.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::with_clock(root, Arc::new(SystemClock))
    }

    /// Open a store resolving server timestamps with `clock`.
    pub fn with_clock(root: impl AsRef<Path>, clock: Arc<dyn Clock>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        info!("initialized file interview store (root={})", root.display());
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
            hub: SubscriptionHub::new(),
            clock,
        })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, key: &RecordId) -> Result<PathBuf, StoreError> {
        let raw = key.as_str();
        let valid = !raw.is_empty()
            && raw != "."
            && raw != ".."
            && !raw.contains(['/', '\\'])
            && !raw.ends_with(".tmp");
        if !valid {
            return Err(StoreError::InvalidKey(raw.to_string()));
        }
        Ok(self.root.join(format!("{raw}.{DOCUMENT_EXTENSION}")))
    }

    fn read_document(&self, key: &RecordId) -> Result<Option<InterviewRecord>, StoreError> {
        let path = self.document_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        read_record(&path).map(Some)
    }

    /// Replace a document via temp file + rename so readers never observe a
    /// partial write. The temp file is removed if either step fails.
    fn write_document(&self, key: &RecordId, record: &InterviewRecord) -> Result<(), StoreError> {
        let path = self.document_path(key)?;
        let temp_path = path.with_extension(format!("{DOCUMENT_EXTENSION}.tmp"));
        let body = serde_json::to_string_pretty(record)?;
        let written = write_synced(&temp_path, body.as_bytes())
            .and_then(|()| fs::rename(&temp_path, &path));
        if let Err(err) = written {
            if let Err(cleanup) = fs::remove_file(&temp_path)
                && cleanup.kind() != ErrorKind::NotFound
            {
                warn!(
                    "failed to remove temp document (path={}, err={})",
                    temp_path.display(),
                    cleanup
                );
            }
            return Err(err.into());
        }
        Ok(())
    }

    /// Every decodable document owned by `owner`, in key order. Documents
    /// that cannot be read or decoded are skipped.
    fn load_owner(&self, owner: &UserId) -> Result<Vec<StoredInterview>, StoreError> {
        let mut documents = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(DOCUMENT_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let record = match read_record(&path) {
                Ok(record) => record,
                Err(err) => {
                    warn!(
                        "skipping unreadable interview document (path={}, err={})",
                        path.display(),
                        err
                    );
                    continue;
                }
            };
            if &record.user_id == owner {
                documents.push(StoredInterview {
                    key: RecordId::from(stem),
                    record,
                });
            }
        }
        documents.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(documents)
    }

    /// Publish fresh snapshots for `owners`. Callers hold `write_lock` so
    /// publishes land in write order.
    fn notify(&self, owners: &[&UserId]) {
        for (idx, owner) in owners.iter().enumerate() {
            if owners[..idx].contains(owner) || !self.hub.is_watched(owner) {
                continue;
            }
            match self.load_owner(owner) {
                Ok(snapshot) => self.hub.publish(owner, snapshot),
                Err(err) => warn!(
                    "failed to refresh owner snapshot (owner={}, err={})",
                    owner, err
                ),
            }
        }
    }
}

fn write_synced(path: &Path, body: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;
    file.write_all(body)?;
    file.sync_all()
}

fn read_record(path: &Path) -> Result<InterviewRecord, StoreError> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

#[async_trait]
impl InterviewStore for FileInterviewStore {
    async fn create(&self, interview: NewInterview) -> Result<RecordId, StoreError> {
        let record = interview.into_record(self.clock.now());
        let _guard = self.write_lock.lock();
        let mut key = generate_key();
        while self.document_path(&key)?.exists() {
            key = generate_key();
        }
        self.write_document(&key, &record)?;
        info!(
            "allocated interview document (key={}, owner={})",
            key, record.user_id
        );
        self.notify(&[&record.user_id]);
        Ok(key)
    }

    async fn get(&self, key: &RecordId) -> Result<Option<StoredInterview>, StoreError> {
        Ok(self.read_document(key)?.map(|record| StoredInterview {
            key: key.clone(),
            record,
        }))
    }

    async fn update(&self, key: &RecordId, patch: RecordPatch) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        let mut record = self
            .read_document(key)?
            .ok_or_else(|| StoreError::NotFound(key.clone()))?;
        let previous_owner = record.user_id.clone();
        record.apply(&patch, self.clock.now());
        self.write_document(key, &record)?;
        debug!("updated interview document (key={})", key);
        self.notify(&[&previous_owner, &record.user_id]);
        Ok(())
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<StoredInterview>, StoreError> {
        self.load_owner(owner)
    }

    fn watch_owner(&self, owner: &UserId) -> Result<OwnerSubscription, StoreError> {
        let _guard = self.write_lock.lock();
        let initial = self.load_owner(owner)?;
        Ok(self.hub.subscribe(owner.clone(), initial))
    }
}
