pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::github::{GitHubSettings, GitHubStore};
pub use config::local::LocalStore;
pub use config::toml_config::{AppConfig, Backend};
pub use core::aggregation::{cumulative_gpa, report, term_gpa, LedgerReport};
pub use core::ledger::Ledger;
pub use core::session::Session;
pub use core::snapshot::Snapshot;
pub use domain::grading::{rank, score_to_grade, LetterGrade, Rank};
pub use domain::model::{CourseInput, Record, RecordId};
pub use domain::ports::{Revision, SnapshotStore, StoredSnapshot};
pub use utils::error::{LedgerError, Result};
