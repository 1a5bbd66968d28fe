pub mod aggregation;
pub mod ledger;
pub mod session;
pub mod snapshot;

pub use crate::domain::model::{CourseInput, Record, RecordId, RecordRow};
pub use crate::domain::ports::{Revision, SnapshotStore, StoredSnapshot};
pub use crate::utils::error::Result;
