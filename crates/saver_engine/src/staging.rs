use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use thiserror::Error;
use uuid::Uuid;

use crate::message::DownloadStyleRequest;
use crate::persist::{AtomicFileWriter, PersistError};

/// How many times the helper session re-reads the store while waiting for
/// the broker's write to become visible.
pub const POLL_RETRIES: u32 = 10;
/// Delay between polling attempts.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
pub enum StagingError {
    #[error("download data not found in storage for key {key:?}")]
    NotFound { key: String },
    #[error("staging path has no parent directory: {0:?}")]
    InvalidPath(PathBuf),
    #[error("staging io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("staging serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Local-scope key-value store holding staged download requests until the
/// helper session consumes them.
pub trait StagingStore: Send + Sync {
    fn put(&self, key: &str, request: &DownloadStyleRequest) -> Result<(), StagingError>;

    /// Reads and deletes in one step so a staged request is consumed at
    /// most once.
    fn take(&self, key: &str) -> Result<Option<DownloadStyleRequest>, StagingError>;
}

/// Generates a one-time staging key: `dl_{millis}_{nonce}`.
pub fn generate_staging_key() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let nonce = Uuid::new_v4().simple().to_string();
    format!("dl_{millis}_{}", &nonce[..8])
}

/// Polls the store for a staged request, taking it on first sight. Fails
/// once the bounded retries are exhausted.
pub async fn poll_take(
    store: &dyn StagingStore,
    key: &str,
) -> Result<DownloadStyleRequest, StagingError> {
    for attempt in 0..POLL_RETRIES {
        if let Some(request) = store.take(key)? {
            return Ok(request);
        }
        if attempt + 1 < POLL_RETRIES {
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
    Err(StagingError::NotFound {
        key: key.to_string(),
    })
}

/// In-memory store used in tests and single-process runs.
#[derive(Debug, Default)]
pub struct MemoryStagingStore {
    entries: Mutex<HashMap<String, DownloadStyleRequest>>,
}

impl MemoryStagingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StagingStore for MemoryStagingStore {
    fn put(&self, key: &str, request: &DownloadStyleRequest) -> Result<(), StagingError> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), request.clone());
        Ok(())
    }

    fn take(&self, key: &str) -> Result<Option<DownloadStyleRequest>, StagingError> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(entries.remove(key))
    }
}

/// File-backed store: a single JSON map rewritten atomically on every
/// mutation, so a broker process and a helper process can share it.
///
/// Mutations are load-modify-store cycles without a file lock; the store
/// assumes one writer at a time (the broker stages, then hands the key to
/// exactly one helper session).
#[derive(Debug, Clone)]
pub struct JsonFileStagingStore {
    path: PathBuf,
}

impl JsonFileStagingStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn load(&self) -> Result<HashMap<String, DownloadStyleRequest>, StagingError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn store(&self, entries: &HashMap<String, DownloadStyleRequest>) -> Result<(), StagingError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            Some(_) => PathBuf::from("."),
            None => return Err(StagingError::InvalidPath(self.path.clone())),
        };
        let filename = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StagingError::InvalidPath(self.path.clone()))?;
        let content = serde_json::to_string_pretty(entries)?;
        let writer = AtomicFileWriter::new(dir);
        writer.write(filename, content.as_bytes())?;
        Ok(())
    }
}

impl StagingStore for JsonFileStagingStore {
    fn put(&self, key: &str, request: &DownloadStyleRequest) -> Result<(), StagingError> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), request.clone());
        self.store(&entries)
    }

    fn take(&self, key: &str) -> Result<Option<DownloadStyleRequest>, StagingError> {
        let mut entries = self.load()?;
        let taken = entries.remove(key);
        if taken.is_some() {
            self.store(&entries)?;
        }
        Ok(taken)
    }
}
