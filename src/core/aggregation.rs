use crate::core::ledger::Ledger;
use crate::domain::grading::{rank, Rank};
use crate::domain::model::Record;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CumulativeGpa {
    pub total_credits: i64,
    pub gpa4: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TermGpa {
    pub gpa4: f64,
    pub gpa10: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermSummary {
    pub term: String,
    pub credits: i64,
    pub gpa4: f64,
    pub gpa10: f64,
    pub record_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerReport {
    pub cumulative: CumulativeGpa,
    pub rank: Rank,
    pub terms: Vec<TermSummary>,
}

/// Best attempt per course code. A later attempt replaces the kept one only
/// with a strictly higher score, so the first of equal scores stays.
pub fn best_attempts(records: &[Record]) -> Vec<&Record> {
    let mut order: Vec<&str> = Vec::new();
    let mut best: HashMap<&str, &Record> = HashMap::new();

    for record in records {
        match best.get(record.code()).copied() {
            None => {
                order.push(record.code());
                best.insert(record.code(), record);
            }
            Some(kept) if record.score10() > kept.score10() => {
                best.insert(record.code(), record);
            }
            Some(_) => {}
        }
    }

    order.into_iter().filter_map(|code| best.get(code).copied()).collect()
}

/// Credits and credit-weighted 4-point GPA over the best attempt per course.
pub fn cumulative_gpa(ledger: &Ledger) -> CumulativeGpa {
    let selected = best_attempts(ledger.records());
    let total_credits: i64 = selected.iter().map(|r| i64::from(r.credits())).sum();

    if selected.is_empty() || total_credits <= 0 {
        return CumulativeGpa {
            total_credits: 0,
            gpa4: 0.0,
        };
    }

    let weighted: f64 = selected
        .iter()
        .map(|r| r.gpa4() * f64::from(r.credits()))
        .sum();

    CumulativeGpa {
        total_credits,
        gpa4: weighted / total_credits as f64,
    }
}

/// Credit-weighted 4-point and 10-point means over exactly the given records.
pub fn term_gpa<'a, I>(records: I) -> TermGpa
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut credits: i64 = 0;
    let mut weighted4 = 0.0;
    let mut weighted10 = 0.0;

    for record in records {
        let weight = f64::from(record.credits());
        credits += i64::from(record.credits());
        weighted4 += record.gpa4() * weight;
        weighted10 += record.score10() * weight;
    }

    if credits <= 0 {
        return TermGpa {
            gpa4: 0.0,
            gpa10: 0.0,
        };
    }

    TermGpa {
        gpa4: weighted4 / credits as f64,
        gpa10: weighted10 / credits as f64,
    }
}

pub fn report(ledger: &Ledger) -> LedgerReport {
    let cumulative = cumulative_gpa(ledger);

    let terms = ledger
        .term_groups()
        .into_iter()
        .map(|(term, records)| {
            let gpa = term_gpa(records.iter().copied());
            TermSummary {
                term: term.to_string(),
                credits: records.iter().map(|r| i64::from(r.credits())).sum(),
                gpa4: gpa.gpa4,
                gpa10: gpa.gpa10,
                record_count: records.len(),
            }
        })
        .collect();

    LedgerReport {
        cumulative,
        rank: rank(cumulative.gpa4),
        terms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_of(records: Vec<Record>) -> Ledger {
        Ledger::from_records(records)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_cumulative_picks_best_attempt() {
        let ledger = ledger_of(vec![
            Record::new("MATH101", "Calculus", "HK1", 3, 6.0),
            Record::new("MATH101", "Calculus", "HK2", 3, 8.0),
        ]);

        let best = best_attempts(ledger.records());
        assert_eq!(best.len(), 1);
        assert_eq!(best[0].term(), "HK2");

        let cumulative = cumulative_gpa(&ledger);
        assert_eq!(cumulative.total_credits, 3);
        assert!(approx(cumulative.gpa4, 3.5));
    }

    #[test]
    fn test_cumulative_weights_by_credits() {
        let ledger = ledger_of(vec![
            Record::new("A1", "", "HK1", 4, 9.0),
            Record::new("B1", "", "HK1", 2, 5.5),
        ]);

        let cumulative = cumulative_gpa(&ledger);
        assert_eq!(cumulative.total_credits, 6);
        assert!(approx(cumulative.gpa4, (4.0 * 4.0 + 2.0 * 2.0) / 6.0));
    }

    #[test]
    fn test_ties_keep_first_attempt() {
        let ledger = ledger_of(vec![
            Record::new("A1", "", "HK1", 2, 7.0),
            Record::new("A1", "", "HK2", 5, 7.0),
        ]);

        let best = best_attempts(ledger.records());
        assert_eq!(best[0].term(), "HK1");
        assert_eq!(cumulative_gpa(&ledger).total_credits, 2);
    }

    #[test]
    fn test_cumulative_is_order_independent_without_ties() {
        let records = vec![
            Record::new("A1", "", "HK1", 3, 4.5),
            Record::new("B1", "", "HK1", 2, 8.7),
            Record::new("A1", "", "HK2", 3, 7.1),
            Record::new("C1", "", "HK2", 4, 6.6),
            Record::new("B1", "", "HK3", 2, 5.0),
        ];
        let expected = cumulative_gpa(&ledger_of(records.clone()));

        let mut reversed = records.clone();
        reversed.reverse();
        let mut rotated = records;
        rotated.rotate_left(2);

        for permutation in [reversed, rotated] {
            let got = cumulative_gpa(&ledger_of(permutation));
            assert_eq!(got.total_credits, expected.total_credits);
            assert!(approx(got.gpa4, expected.gpa4));
        }
    }

    #[test]
    fn test_empty_inputs_are_zero() {
        assert_eq!(
            cumulative_gpa(&Ledger::new()),
            CumulativeGpa {
                total_credits: 0,
                gpa4: 0.0
            }
        );
        assert_eq!(
            term_gpa(std::iter::empty::<&Record>()),
            TermGpa {
                gpa4: 0.0,
                gpa10: 0.0
            }
        );
    }

    #[test]
    fn test_zero_and_negative_credits_do_not_divide() {
        let zero = ledger_of(vec![Record::new("A1", "", "HK1", 0, 9.0)]);
        let cumulative = cumulative_gpa(&zero);
        assert_eq!(cumulative.total_credits, 0);
        assert_eq!(cumulative.gpa4, 0.0);

        let cancelling = vec![
            Record::new("A1", "", "HK1", 3, 9.0),
            Record::new("B1", "", "HK1", -3, 9.0),
        ];
        let term = term_gpa(&cancelling);
        assert!(!term.gpa4.is_nan());
        assert_eq!(term.gpa4, 0.0);
        assert_eq!(term.gpa10, 0.0);
    }

    #[test]
    fn test_term_gpa_keeps_duplicates() {
        let records = vec![
            Record::new("A1", "", "HK1", 3, 6.0),
            Record::new("A1", "", "HK1", 3, 9.0),
        ];
        let term = term_gpa(&records);
        assert!(approx(term.gpa4, 3.0));
        assert!(approx(term.gpa10, 7.5));
    }

    #[test]
    fn test_report_lists_terms_in_order() {
        let ledger = ledger_of(vec![
            Record::new("MATH101", "", "HK2", 3, 8.0),
            Record::new("MATH101", "", "HK1", 3, 6.0),
            Record::new("CS101", "", "HK1", 4, 9.0),
        ]);

        let report = report(&ledger);
        let terms: Vec<&str> = report.terms.iter().map(|t| t.term.as_str()).collect();
        assert_eq!(terms, vec!["HK1", "HK2"]);
        assert_eq!(report.terms[0].credits, 7);
        assert_eq!(report.terms[0].record_count, 2);
        assert_eq!(report.cumulative.total_credits, 7);
        assert!(approx(report.cumulative.gpa4, (3.5 * 3.0 + 4.0 * 4.0) / 7.0));
        assert_eq!(report.rank, Rank::Excellent);
    }
}
