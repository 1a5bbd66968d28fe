use crate::core::ledger::Ledger;
use crate::utils::error::Result;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    code: &'a str,
    name: &'a str,
    term: &'a str,
    credits: i32,
    score10: f64,
    letter: &'a str,
    gpa4: f64,
}

pub fn write_csv<W: Write>(ledger: &Ledger, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in ledger.records() {
        csv_writer.serialize(ExportRow {
            code: record.code(),
            name: record.name(),
            term: record.term(),
            credits: record.credits(),
            score10: record.score10(),
            letter: record.letter(),
            gpa4: record.gpa4(),
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn export_csv<P: AsRef<Path>>(ledger: &Ledger, path: P) -> Result<usize> {
    let file = std::fs::File::create(path.as_ref())?;
    write_csv(ledger, file)?;
    tracing::info!(
        "Exported {} record(s) to {}",
        ledger.len(),
        path.as_ref().display()
    );
    Ok(ledger.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Record;

    #[test]
    fn test_csv_has_header_and_derived_columns() {
        let ledger = Ledger::from_records(vec![
            Record::new("MATH101", "Calculus, part 1", "HK1", 3, 8.5),
            Record::new("CS101", "Intro", "HK2", 4, 3.0),
        ]);

        let mut buffer = Vec::new();
        write_csv(&ledger, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "code,name,term,credits,score10,letter,gpa4");
        assert_eq!(lines[1], "MATH101,\"Calculus, part 1\",HK1,3,8.5,A,4.0");
        assert_eq!(lines[2], "CS101,Intro,HK2,4,3.0,F,0.0");
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("grades.csv");
        let ledger = Ledger::from_records(vec![Record::new("A1", "", "HK1", 2, 7.0)]);

        assert_eq!(export_csv(&ledger, &path).unwrap(), 1);
        assert!(std::fs::read_to_string(&path).unwrap().contains("A1,,HK1,2,7.0,B,3.0"));
    }
}
