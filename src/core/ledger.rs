use crate::domain::model::{normalize_code, normalize_term, CourseInput, Record, RecordId};
use crate::utils::error::{LedgerError, Result};
use crate::utils::validation::{parse_credits, parse_score, require_text};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// The course records of one student, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    records: Vec<Record>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a ledger from stored records without re-validating them.
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Appends a new attempt. Duplicate `(code, term)` pairs are allowed.
    pub fn add(&mut self, input: &CourseInput) -> Result<RecordId> {
        let record = build_record(RecordId::new(), input)?;
        let id = record.id();
        tracing::debug!("Adding {} ({}) to the ledger", record.code(), record.term());
        self.records.push(record);
        Ok(id)
    }

    /// Replaces the first record matching the input's `(code, term)`. Later
    /// matches are left untouched. The replaced slot keeps its id.
    pub fn update(&mut self, input: &CourseInput) -> Result<RecordId> {
        let code = normalize_code(&input.code);
        let term = normalize_term(&input.term);

        let slot = self
            .records
            .iter_mut()
            .find(|r| r.matches(&code, &term))
            .ok_or_else(|| LedgerError::NotFound {
                code: code.clone(),
                term: term.clone(),
            })?;

        let replacement = build_record(slot.id(), input)?;
        tracing::debug!("Updating {} ({})", code, term);
        *slot = replacement;
        Ok(slot.id())
    }

    /// Removes every record matching `(code, term)` and returns how many went.
    pub fn delete(&mut self, code: &str, term: &str) -> Result<usize> {
        let code = normalize_code(code);
        let term = normalize_term(term);

        let before = self.records.len();
        self.records.retain(|r| !r.matches(&code, &term));
        let removed = before - self.records.len();

        if removed == 0 {
            return Err(LedgerError::NotFound { code, term });
        }
        tracing::debug!("Deleted {} record(s) of {} ({})", removed, code, term);
        Ok(removed)
    }

    /// Describes how `record` compares with every other attempt at the same
    /// course, e.g. `"Lower than HK2"`. Empty when there is no other attempt.
    pub fn comparison_note(&self, record: &Record) -> String {
        self.records
            .iter()
            .filter(|other| other.code() == record.code() && other.id() != record.id())
            .map(|other| {
                let verdict = match record.score10().partial_cmp(&other.score10()) {
                    Some(Ordering::Greater) => "Higher than",
                    Some(Ordering::Less) => "Lower than",
                    _ => "Equal to",
                };
                format!("{} {}", verdict, other.term())
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Records grouped by term label, terms in ascending order.
    pub fn term_groups(&self) -> BTreeMap<&str, Vec<&Record>> {
        let mut groups: BTreeMap<&str, Vec<&Record>> = BTreeMap::new();
        for record in &self.records {
            groups.entry(record.term()).or_default().push(record);
        }
        groups
    }
}

fn build_record(id: RecordId, input: &CourseInput) -> Result<Record> {
    let code = require_text("code", &input.code)?;
    let term = require_text("term", &input.term)?;
    let credits = parse_credits(&input.credits)?;
    let score10 = parse_score(&input.score10)?;
    Ok(Record::with_id(id, code, &input.name, term, credits, score10))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(code: &str, term: &str, credits: &str, score: &str) -> CourseInput {
        CourseInput::new(code, format!("{} course", code), term, credits, score)
    }

    fn math_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.add(&input("MATH101", "HK1", "3", "6.0")).unwrap();
        ledger.add(&input("MATH101", "HK2", "3", "8.0")).unwrap();
        ledger
    }

    #[test]
    fn test_add_normalizes_and_appends() {
        let mut ledger = Ledger::new();
        let id = ledger
            .add(&CourseInput::new(" math101 ", " Calculus ", " HK1 ", " 3 ", "7.5"))
            .unwrap();

        let record = ledger.get(id).unwrap();
        assert_eq!(record.code(), "MATH101");
        assert_eq!(record.name(), "Calculus");
        assert_eq!(record.term(), "HK1");
        assert_eq!(record.credits(), 3);
        assert_eq!(record.letter(), "B");
    }

    #[test]
    fn test_add_rejects_invalid_input() {
        let mut ledger = Ledger::new();
        let bad = [
            input("MATH101", "HK1", "three", "7"),
            input("MATH101", "HK1", "3", "seven"),
            input("MATH101", "HK1", "0", "7"),
            input("MATH101", "HK1", "3", "11"),
            input("  ", "HK1", "3", "7"),
            input("MATH101", "", "3", "7"),
        ];
        for case in &bad {
            assert!(
                matches!(ledger.add(case), Err(LedgerError::InvalidInput { .. })),
                "accepted {:?}",
                case
            );
        }
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_update_replaces_only_first_match() {
        let mut ledger = Ledger::new();
        let first = ledger.add(&input("CS101", "HK1", "3", "5.0")).unwrap();
        let second = ledger.add(&input("CS101", "HK1", "3", "6.0")).unwrap();

        let updated = ledger.update(&input("cs101", " HK1", "4", "9.0")).unwrap();

        assert_eq!(updated, first);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.get(first).unwrap().score10(), 9.0);
        assert_eq!(ledger.get(first).unwrap().credits(), 4);
        assert_eq!(ledger.get(first).unwrap().letter(), "A");
        assert_eq!(ledger.get(second).unwrap().score10(), 6.0);
    }

    #[test]
    fn test_delete_removes_all_matches() {
        let mut ledger = Ledger::new();
        ledger.add(&input("CS101", "HK1", "3", "5.0")).unwrap();
        ledger.add(&input("CS101", "HK1", "3", "6.0")).unwrap();
        let kept = ledger.add(&input("CS101", "HK2", "3", "7.0")).unwrap();

        assert_eq!(ledger.delete("cs101", "HK1").unwrap(), 2);
        assert_eq!(ledger.len(), 1);
        assert!(ledger.get(kept).is_some());
    }

    #[test]
    fn test_missing_target_is_not_found() {
        let mut ledger = math_ledger();
        let snapshot = ledger.clone();

        assert!(matches!(
            ledger.update(&input("MATH101", "HK9", "3", "7")),
            Err(LedgerError::NotFound { .. })
        ));
        assert!(matches!(
            ledger.delete("PHYS1", "HK1"),
            Err(LedgerError::NotFound { .. })
        ));
        assert_eq!(ledger, snapshot);
    }

    #[test]
    fn test_failed_update_leaves_record_intact() {
        let mut ledger = math_ledger();
        let snapshot = ledger.clone();
        assert!(ledger.update(&input("MATH101", "HK1", "3", "abc")).is_err());
        assert_eq!(ledger, snapshot);
    }

    #[test]
    fn test_comparison_note_between_attempts() {
        let ledger = math_ledger();
        let hk1 = &ledger.records()[0];
        let hk2 = &ledger.records()[1];

        assert_eq!(ledger.comparison_note(hk1), "Lower than HK2");
        assert_eq!(ledger.comparison_note(hk2), "Higher than HK1");
    }

    #[test]
    fn test_comparison_note_uses_identity_not_value() {
        let mut ledger = Ledger::new();
        ledger.add(&input("CS101", "HK1", "3", "7.0")).unwrap();
        ledger.add(&input("CS101", "HK1", "3", "7.0")).unwrap();
        ledger.add(&input("PHYS1", "HK1", "3", "2.0")).unwrap();

        assert_eq!(ledger.comparison_note(&ledger.records()[0]), "Equal to HK1");
        assert_eq!(ledger.comparison_note(&ledger.records()[2]), "");
    }

    #[test]
    fn test_term_groups_sorted_by_label() {
        let mut ledger = Ledger::new();
        ledger.add(&input("B1", "HK2", "3", "7")).unwrap();
        ledger.add(&input("A1", "HK1", "3", "7")).unwrap();
        ledger.add(&input("C1", "HK2", "3", "7")).unwrap();

        let groups = ledger.term_groups();
        let terms: Vec<&str> = groups.keys().copied().collect();
        assert_eq!(terms, vec!["HK1", "HK2"]);

        let hk2: Vec<&str> = groups["HK2"].iter().map(|r| r.code()).collect();
        assert_eq!(hk2, vec!["B1", "C1"]);
    }
}
