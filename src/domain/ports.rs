use crate::utils::error::Result;
use async_trait::async_trait;
use std::fmt;

/// Opaque version token issued by a store for the bytes it currently holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Revision(String);

impl Revision {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct StoredSnapshot {
    pub data: Vec<u8>,
    pub revision: Revision,
}

/// Whole-file storage for the serialized snapshot.
///
/// `save` is a compare-and-swap: it succeeds only while the stored revision is
/// still `expected`. `expected = None` creates the file and conflicts if it
/// already exists. On mismatch the store returns `LedgerError::Conflict`.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Returns `None` when nothing has been stored yet.
    async fn load(&self) -> Result<Option<StoredSnapshot>>;

    async fn save(
        &self,
        data: &[u8],
        expected: Option<&Revision>,
        message: &str,
    ) -> Result<Revision>;

    /// Human readable location, used in logs and conflict errors.
    fn location(&self) -> String;
}

#[async_trait]
impl<T: SnapshotStore + ?Sized> SnapshotStore for Box<T> {
    async fn load(&self) -> Result<Option<StoredSnapshot>> {
        (**self).load().await
    }

    async fn save(
        &self,
        data: &[u8],
        expected: Option<&Revision>,
        message: &str,
    ) -> Result<Revision> {
        (**self).save(data, expected, message).await
    }

    fn location(&self) -> String {
        (**self).location()
    }
}
