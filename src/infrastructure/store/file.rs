//! File-backed key-value store implementation

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::domain::store::KeyValueStore;
use crate::domain::DomainError;

/// Configuration for the file store
#[derive(Debug, Clone)]
pub struct FileStoreConfig {
    /// Directory holding one file per key
    pub root: PathBuf,
}

impl FileStoreConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

/// Sequence for temporary file names, unique within the process
static TMP_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Durable store keeping each key in its own file under a root directory
///
/// Every write goes to its own synced temporary file that is renamed into
/// place, so a concurrent reader sees either the old or the new value and
/// concurrent writers of one key resolve to last-writer-wins.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens the store, creating the root directory if needed
    pub async fn open(config: &FileStoreConfig) -> Result<Self, DomainError> {
        fs::create_dir_all(&config.root).await.map_err(|e| {
            DomainError::storage(format!(
                "Failed to create store directory {}: {}",
                config.root.display(),
                e
            ))
        })?;

        debug!(root = %config.root.display(), "Opened file store");

        Ok(Self {
            root: config.root.clone(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", encode_key(key)))
    }

    /// Temporary path for one write of `key`; never ends in `.json`
    fn tmp_path_for(&self, key: &str) -> PathBuf {
        let seq = TMP_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        self.root.join(format!(
            "{}.json.{}-{}.tmp",
            encode_key(key),
            std::process::id(),
            seq
        ))
    }
}

async fn write_synced(path: &Path, value: &str) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(value.as_bytes()).await?;
    file.sync_all().await
}

/// Maps a key to a file-name-safe string: `[A-Za-z0-9._-]` is kept, every
/// other byte is written as `%XX`.
fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());

    for byte in key.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' => encoded.push(byte as char),
            b'.' if !encoded.is_empty() => encoded.push('.'),
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }

    encoded
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let path = self.path_for(key);

        match fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DomainError::storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let path = self.path_for(key);
        let tmp_path = self.tmp_path_for(key);

        if let Err(e) = write_synced(&tmp_path, value).await {
            discard(&tmp_path).await;
            return Err(DomainError::storage(format!(
                "Failed to write {}: {}",
                tmp_path.display(),
                e
            )));
        }

        if let Err(e) = fs::rename(&tmp_path, &path).await {
            discard(&tmp_path).await;
            return Err(DomainError::storage(format!(
                "Failed to replace {}: {}",
                path.display(),
                e
            )));
        }

        debug!(key, bytes = value.len(), "Wrote store entry");
        Ok(())
    }
}

async fn discard(tmp_path: &Path) {
    if let Err(e) = fs::remove_file(tmp_path).await {
        if e.kind() != ErrorKind::NotFound {
            warn!(path = %tmp_path.display(), error = %e, "Failed to remove temporary file");
        }
    }
}
