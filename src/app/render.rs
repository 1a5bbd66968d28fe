use crate::core::aggregation::LedgerReport;
use crate::core::ledger::Ledger;
use std::fmt::Write;

/// Records grouped by term, one table per term, each row with its comparison note.
pub fn records_table(ledger: &Ledger) -> String {
    if ledger.is_empty() {
        return "No records yet.\n".to_string();
    }

    let mut out = String::new();
    for (term, records) in ledger.term_groups() {
        let _ = writeln!(out, "== {} ==", term);
        let _ = writeln!(
            out,
            "{:<10} {:<28} {:>7} {:>6} {:>6} {:>5}  {}",
            "Code", "Name", "Credits", "Score", "Letter", "GPA4", "Note"
        );
        for record in records {
            let _ = writeln!(
                out,
                "{:<10} {:<28} {:>7} {:>6.2} {:>6} {:>5.1}  {}",
                record.code(),
                truncate(record.name(), 28),
                record.credits(),
                record.score10(),
                record.letter(),
                record.gpa4(),
                ledger.comparison_note(record)
            );
        }
        out.push('\n');
    }
    out
}

pub fn summary_table(report: &LedgerReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<12} {:>7} {:>7} {:>6} {:>7}",
        "Term", "Courses", "Credits", "GPA4", "GPA10"
    );
    for term in &report.terms {
        let _ = writeln!(
            out,
            "{:<12} {:>7} {:>7} {:>6.2} {:>7.2}",
            term.term, term.record_count, term.credits, term.gpa4, term.gpa10
        );
    }
    let _ = writeln!(
        out,
        "\nCumulative: {} credits, GPA {:.2} ({})",
        report.cumulative.total_credits, report.cumulative.gpa4, report.rank
    );
    out
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}
