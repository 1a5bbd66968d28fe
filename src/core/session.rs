use crate::core::aggregation::{self, LedgerReport};
use crate::core::ledger::Ledger;
use crate::core::snapshot::Snapshot;
use crate::domain::model::{CourseInput, RecordId};
use crate::domain::ports::{Revision, SnapshotStore};
use crate::utils::error::Result;

const CREATE_MESSAGE: &str = "Init DB";

/// One student's working copy of the ledger, bound to the store it came from.
///
/// Every mutation runs on a copy of the ledger and is written to the store
/// before it replaces the in-memory state, so a rejected save leaves the
/// session exactly as it was.
pub struct Session<S: SnapshotStore> {
    store: S,
    student_id: String,
    snapshot: Snapshot,
    ledger: Ledger,
    revision: Option<Revision>,
}

impl<S: SnapshotStore> Session<S> {
    pub async fn open(store: S, student_id: impl Into<String>) -> Result<Self> {
        let student_id = student_id.into();
        let (snapshot, revision) = fetch(&store).await?;
        let ledger = snapshot.ledger(&student_id);

        tracing::info!(
            "Loaded {} record(s) for '{}' from {}",
            ledger.len(),
            student_id,
            store.location()
        );

        Ok(Self {
            store,
            student_id,
            snapshot,
            ledger,
            revision,
        })
    }

    /// Discards the in-memory state and reads the store again.
    pub async fn reload(&mut self) -> Result<()> {
        let (snapshot, revision) = fetch(&self.store).await?;
        self.ledger = snapshot.ledger(&self.student_id);
        self.snapshot = snapshot;
        self.revision = revision;
        tracing::debug!("Reloaded '{}' at revision {:?}", self.student_id, self.revision);
        Ok(())
    }

    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn revision(&self) -> Option<&Revision> {
        self.revision.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn report(&self) -> LedgerReport {
        aggregation::report(&self.ledger)
    }

    pub async fn add(&mut self, input: &CourseInput) -> Result<RecordId> {
        let mut candidate = self.ledger.clone();
        let id = candidate.add(input)?;
        self.commit(candidate).await?;
        tracing::info!("Added {} for '{}'", input.code.trim().to_uppercase(), self.student_id);
        Ok(id)
    }

    pub async fn update(&mut self, input: &CourseInput) -> Result<RecordId> {
        let mut candidate = self.ledger.clone();
        let id = candidate.update(input)?;
        self.commit(candidate).await?;
        tracing::info!("Updated {} for '{}'", input.code.trim().to_uppercase(), self.student_id);
        Ok(id)
    }

    pub async fn delete(&mut self, code: &str, term: &str) -> Result<usize> {
        let mut candidate = self.ledger.clone();
        let removed = candidate.delete(code, term)?;
        self.commit(candidate).await?;
        tracing::info!("Deleted {} record(s) for '{}'", removed, self.student_id);
        Ok(removed)
    }

    async fn commit(&mut self, candidate: Ledger) -> Result<()> {
        let mut snapshot = self.snapshot.clone();
        snapshot.put_ledger(&self.student_id, &candidate);
        let data = snapshot.to_json_pretty()?;

        let message = match self.revision {
            None => CREATE_MESSAGE.to_string(),
            Some(_) => format!("Update {}", self.student_id),
        };
        let revision = match self
            .store
            .save(&data, self.revision.as_ref(), &message)
            .await
        {
            Ok(revision) => revision,
            Err(e) => {
                tracing::warn!("Save for '{}' did not take effect: {}", self.student_id, e);
                return Err(e);
            }
        };

        tracing::debug!("Stored {} bytes at revision {}", data.len(), revision);
        self.snapshot = snapshot;
        self.ledger = candidate;
        self.revision = Some(revision);
        Ok(())
    }
}

async fn fetch<S: SnapshotStore + ?Sized>(store: &S) -> Result<(Snapshot, Option<Revision>)> {
    match store.load().await? {
        Some(stored) => Ok((Snapshot::from_slice(&stored.data)?, Some(stored.revision))),
        None => {
            tracing::debug!("Nothing stored at {} yet", store.location());
            Ok((Snapshot::new(), None))
        }
    }
}
