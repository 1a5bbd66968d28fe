use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::grading::{score_to_grade, LetterGrade};

/// Stable identity of one course attempt inside a ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId(Uuid);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One course attempt. The letter grade and 4-point value are derived from
/// `score10` when the record is built and cannot be set on their own.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: RecordId,
    code: String,
    name: String,
    term: String,
    credits: i32,
    score10: f64,
    grade: LetterGrade,
}

impl Record {
    /// Builds a record without range checks. Text fields are normalized.
    pub fn new(code: &str, name: &str, term: &str, credits: i32, score10: f64) -> Self {
        Self::with_id(RecordId::new(), code, name, term, credits, score10)
    }

    pub(crate) fn with_id(
        id: RecordId,
        code: &str,
        name: &str,
        term: &str,
        credits: i32,
        score10: f64,
    ) -> Self {
        Self {
            id,
            code: normalize_code(code),
            name: name.trim().to_string(),
            term: normalize_term(term),
            credits,
            score10,
            grade: score_to_grade(score10),
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn credits(&self) -> i32 {
        self.credits
    }

    pub fn score10(&self) -> f64 {
        self.score10
    }

    pub fn grade(&self) -> LetterGrade {
        self.grade
    }

    pub fn letter(&self) -> &'static str {
        self.grade.as_str()
    }

    pub fn gpa4(&self) -> f64 {
        self.grade.points()
    }

    pub fn matches(&self, code: &str, term: &str) -> bool {
        self.code == code && self.term == term
    }

    pub fn to_row(&self) -> RecordRow {
        RecordRow {
            code: self.code.clone(),
            name: self.name.clone(),
            term: self.term.clone(),
            credits: self.credits,
            score10: self.score10,
        }
    }
}

pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

pub fn normalize_term(term: &str) -> String {
    term.trim().to_string()
}

/// Persisted shape of a record inside a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordRow {
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "semester", alias = "term")]
    pub term: String,
    pub credits: i32,
    #[serde(rename = "score_10", alias = "score10")]
    pub score10: f64,
}

impl RecordRow {
    pub fn into_record(self) -> Record {
        Record::new(&self.code, &self.name, &self.term, self.credits, self.score10)
    }
}

/// Raw course form input, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseInput {
    pub code: String,
    pub name: String,
    pub term: String,
    pub credits: String,
    pub score10: String,
}

impl CourseInput {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        term: impl Into<String>,
        credits: impl Into<String>,
        score10: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            term: term.into(),
            credits: credits.into(),
            score10: score10.into(),
        }
    }
}
