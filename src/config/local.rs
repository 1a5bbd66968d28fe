use crate::core::{Result, Revision, SnapshotStore, StoredSnapshot};
use crate::utils::error::LedgerError;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Snapshot kept as a JSON file on local disk. The revision is the SHA-256 of
/// the file contents.
#[derive(Debug, Clone)]
pub struct LocalStore {
    base_path: PathBuf,
    file_name: String,
}

impl LocalStore {
    pub fn new(base_path: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            file_name: file_name.into(),
        }
    }

    pub fn full_path(&self) -> PathBuf {
        self.base_path.join(&self.file_name)
    }

    fn read_current(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        match fs::read(path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(unavailable(path, e)),
        }
    }
}

pub fn content_revision(data: &[u8]) -> Revision {
    let mut hasher = Sha256::new();
    hasher.update(data);
    Revision::new(hex::encode(hasher.finalize()))
}

fn unavailable(path: &Path, err: io::Error) -> LedgerError {
    LedgerError::StorageUnavailable {
        message: format!("{}: {}", path.display(), err),
    }
}

#[async_trait]
impl SnapshotStore for LocalStore {
    async fn load(&self) -> Result<Option<StoredSnapshot>> {
        let path = self.full_path();
        tracing::debug!("Reading snapshot from {}", path.display());

        Ok(self.read_current(&path)?.map(|data| StoredSnapshot {
            revision: content_revision(&data),
            data,
        }))
    }

    async fn save(
        &self,
        data: &[u8],
        expected: Option<&Revision>,
        _message: &str,
    ) -> Result<Revision> {
        let path = self.full_path();

        let current = self.read_current(&path)?.map(|d| content_revision(&d));
        if current.as_ref() != expected {
            return Err(LedgerError::Conflict {
                path: path.display().to_string(),
            });
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| unavailable(parent, e))?;
        }

        // Write next to the target and rename so a crash never leaves half a file.
        let staging = path.with_extension("tmp");
        fs::write(&staging, data).map_err(|e| unavailable(&staging, e))?;
        fs::rename(&staging, &path).map_err(|e| unavailable(&path, e))?;

        tracing::debug!("Wrote {} bytes to {}", data.len(), path.display());
        Ok(content_revision(data))
    }

    fn location(&self) -> String {
        self.full_path().display().to_string()
    }
}
