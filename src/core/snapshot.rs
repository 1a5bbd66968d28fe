//! Serialized form of every student's ledger.
//!
//! Two shapes exist on disk. The legacy single-student file is a bare array of
//! rows and is read as the `DEFAULT` student. The multi-student file maps a
//! student id to either a bare array or a password-gated object
//! `{"password": ..., "data": [...]}`. Entries keep their shape on save.

use crate::core::ledger::Ledger;
use crate::domain::model::{Record, RecordRow};
use crate::utils::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_STUDENT: &str = "DEFAULT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StudentEntry {
    Gated {
        password: String,
        data: Vec<RecordRow>,
    },
    Plain(Vec<RecordRow>),
}

impl StudentEntry {
    pub fn rows(&self) -> &[RecordRow] {
        match self {
            StudentEntry::Gated { data, .. } => data.as_slice(),
            StudentEntry::Plain(rows) => rows.as_slice(),
        }
    }

    pub fn password(&self) -> Option<&str> {
        match self {
            StudentEntry::Gated { password, .. } => Some(password.as_str()),
            StudentEntry::Plain(_) => None,
        }
    }

    fn with_rows(&self, rows: Vec<RecordRow>) -> Self {
        match self {
            StudentEntry::Gated { password, .. } => StudentEntry::Gated {
                password: password.clone(),
                data: rows,
            },
            StudentEntry::Plain(_) => StudentEntry::Plain(rows),
        }
    }
}

#[derive(Deserialize)]
struct GatedEntry {
    password: String,
    data: Vec<serde_json::Value>,
}

fn malformed(message: String) -> serde_json::Error {
    <serde_json::Error as serde::de::Error>::custom(message)
}

fn rows_from_values(student_id: &str, values: Vec<serde_json::Value>) -> Result<Vec<RecordRow>> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value::<RecordRow>(value).map_err(|e| {
                LedgerError::from(malformed(format!(
                    "student '{}', row {}: {}",
                    student_id, index, e
                )))
            })
        })
        .collect()
}

fn entry_from_value(student_id: &str, value: serde_json::Value) -> Result<StudentEntry> {
    match value {
        serde_json::Value::Array(values) => {
            Ok(StudentEntry::Plain(rows_from_values(student_id, values)?))
        }
        other => {
            let gated: GatedEntry = serde_json::from_value(other)
                .map_err(|e| malformed(format!("student '{}': {}", student_id, e)))?;
            Ok(StudentEntry::Gated {
                password: gated.password,
                data: rows_from_values(student_id, gated.data)?,
            })
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    students: BTreeMap<String, StudentEntry>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_slice(data: &[u8]) -> Result<Self> {
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::new());
        }

        let students = match serde_json::from_slice::<serde_json::Value>(data)? {
            serde_json::Value::Array(values) => {
                tracing::warn!(
                    "Snapshot uses the single-student layout, loading it as '{}'",
                    DEFAULT_STUDENT
                );
                let rows = rows_from_values(DEFAULT_STUDENT, values)?;
                BTreeMap::from([(DEFAULT_STUDENT.to_string(), StudentEntry::Plain(rows))])
            }
            serde_json::Value::Object(entries) => entries
                .into_iter()
                .map(|(id, value)| Ok((id.clone(), entry_from_value(&id, value)?)))
                .collect::<Result<BTreeMap<_, _>>>()?,
            _ => {
                return Err(malformed(
                    "expected an array of records or an object keyed by student".to_string(),
                )
                .into())
            }
        };
        Ok(Self { students })
    }

    pub fn to_json_pretty(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(&self.students)?)
    }

    pub fn student_ids(&self) -> impl Iterator<Item = &str> {
        self.students.keys().map(String::as_str)
    }

    pub fn entry(&self, student_id: &str) -> Option<&StudentEntry> {
        self.students.get(student_id)
    }

    /// The student's ledger, empty when the student has no entry yet.
    pub fn ledger(&self, student_id: &str) -> Ledger {
        let records: Vec<Record> = self
            .students
            .get(student_id)
            .map(|entry| entry.rows().iter().cloned().map(RecordRow::into_record).collect())
            .unwrap_or_default();
        Ledger::from_records(records)
    }

    /// Stores the ledger under `student_id`, keeping a password-gated entry gated.
    pub fn put_ledger(&mut self, student_id: &str, ledger: &Ledger) {
        let rows: Vec<RecordRow> = ledger.records().iter().map(Record::to_row).collect();
        let entry = match self.students.get(student_id) {
            Some(existing) => existing.with_rows(rows),
            None => StudentEntry::Plain(rows),
        };
        self.students.insert(student_id.to_string(), entry);
    }
}
