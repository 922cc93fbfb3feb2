use log::{info, warn};

use canvass_parsing::*;
use snafu::{prelude::*, Snafu};

use std::fs;

use serde::Serialize;
use serde_json::json;

use crate::args::Args;

pub mod io_csv;

#[derive(Debug, Snafu)]
pub enum CanvassError {
    #[snafu(display("Error opening report {path}"))]
    OpeningReport {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Contest number {number} too large: the report only has {count} sections"))]
    ContestOutOfRange { number: usize, count: usize },
    #[snafu(display("Contest {number} could not be parsed"))]
    ParsingContest {
        source: canvass_parsing::ParseErrors,
        number: usize,
    },
    #[snafu(display("Error creating csv file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error writing csv record"))]
    CsvWrite { source: csv::Error },
    #[snafu(display("Error flushing csv output"))]
    CsvFlush { source: std::io::Error },
    #[snafu(display("Error rendering the contest directory as JSON"))]
    RenderingJson { source: serde_json::Error },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type CanvassResult<T> = Result<T, CanvassError>;

/// One row of the contest directory, ready for display.
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct ContestEntry {
    pub number: usize,
    pub title: String,
}

/// Reads a report and returns its contests, ordered by contest number.
///
/// Duplicated titles show up re-keyed with their contest number appended,
/// the way the directory stores them.
pub fn contest_listing(import_path: &str) -> CanvassResult<Vec<ContestEntry>> {
    let report =
        fs::read_to_string(import_path).context(OpeningReportSnafu { path: import_path })?;
    let mut entries: Vec<ContestEntry> = contest_directory(&report)
        .into_iter()
        .map(|(title, number)| ContestEntry { number, title })
        .collect();
    entries.sort_by_key(|entry| entry.number);
    Ok(entries)
}

/// Builds the table for one contest of a report.
///
/// With an export path the table is written there as CSV and `None` is
/// returned; without one the caller receives the table itself.
pub fn export_contest(
    import_path: &str,
    contest_number: usize,
    export_path: Option<&str>,
) -> CanvassResult<Option<ContestTable>> {
    info!("At contest number {}", contest_number);
    let report =
        fs::read_to_string(import_path).context(OpeningReportSnafu { path: import_path })?;
    let contests = split_contests(&report);
    ensure!(
        contest_number < contests.len(),
        ContestOutOfRangeSnafu {
            number: contest_number,
            count: contests.len(),
        }
    );
    let table = build_contest_table(contests[contest_number]).context(ParsingContestSnafu {
        number: contest_number,
    })?;
    match export_path {
        Some(path) => {
            io_csv::write_contest_csv(&table, path)?;
            info!("Wrote {} precinct rows to {}", table.rows.len(), path);
            Ok(None)
        }
        None => Ok(Some(table)),
    }
}

pub fn run(args: &Args) -> CanvassResult<()> {
    if args.list {
        let entries = contest_listing(&args.input)?;
        if entries.is_empty() {
            warn!("No contests found in {}", args.input);
        }
        if args.json {
            let directory_js = json!({ "contests": entries });
            let pretty =
                serde_json::to_string_pretty(&directory_js).context(RenderingJsonSnafu {})?;
            println!("{}", pretty);
        } else {
            for entry in &entries {
                println!("{:>4}  {}", entry.number, entry.title);
            }
        }
        return Ok(());
    }

    let contest_number = match args.contest {
        Some(number) => number,
        None => {
            whatever!("No contest number given. Use --list to see the contests of the report.")
        }
    };
    match export_contest(&args.input, contest_number, args.out.as_deref())? {
        Some(table) => io_csv::write_contest_stdout(&table),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const REPORT: &str = "\
GENERAL ELECTION
WARREN COUNTY, OHIO
==========================
            VOTES  PERCENT
U.S. SENATE
vote for not more than 1
01 = Alice A
02 = Bob B
03 = overvotes
04 = undervotes
0001    Precinct One     100   90   1   0
0002 0005 Precinct Two   50 40 0 1
==========================";

    fn write_report(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("warren_18.txt");
        fs::write(&path, REPORT).unwrap();
        path
    }

    #[test]
    fn exports_a_fully_quoted_csv() {
        let dir = tempfile::tempdir().unwrap();
        let report_path = write_report(&dir);
        let out_path = dir.path().join("senate_2018.csv");
        let table = export_contest(
            report_path.to_str().unwrap(),
            1,
            Some(out_path.to_str().unwrap()),
        )
        .unwrap();
        assert!(table.is_none());

        let contents = fs::read_to_string(&out_path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "\"U.S. SENATE\"");
        assert_eq!(
            lines[1],
            "\"Primary precinct ID\",\"Secondary precinct ID\",\"Precinct name\",\
             \"Alice A\",\"Bob B\",\"overvotes\",\"undervotes\""
        );
        assert_eq!(
            lines[2],
            "\"0001\",\"\",\"Precinct One\",\"100\",\"90\",\"1\",\"0\""
        );
        assert_eq!(
            lines[3],
            "\"0002\",\"0005\",\"Precinct Two\",\"50\",\"40\",\"0\",\"1\""
        );
    }

    #[test]
    fn returns_the_table_without_an_export_path() {
        let dir = tempfile::tempdir().unwrap();
        let report_path = write_report(&dir);
        let table = export_contest(report_path.to_str().unwrap(), 1, None)
            .unwrap()
            .unwrap();
        assert_eq!(table.title, "U.S. SENATE");
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn rejects_an_out_of_range_contest_number() {
        let dir = tempfile::tempdir().unwrap();
        let report_path = write_report(&dir);
        match export_contest(report_path.to_str().unwrap(), 6, None) {
            Err(CanvassError::ContestOutOfRange { number, count }) => {
                assert_eq!(number, 6);
                assert_eq!(count, 2);
            }
            other => panic!("expected ContestOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn listing_is_ordered_by_contest_number() {
        let dir = tempfile::tempdir().unwrap();
        let report_path = write_report(&dir);
        let entries = contest_listing(report_path.to_str().unwrap()).unwrap();
        assert_eq!(
            entries,
            vec![ContestEntry {
                number: 1,
                title: "U.S. SENATE".to_string(),
            }]
        );
    }
}
