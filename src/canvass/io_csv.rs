// Writing contest tables out as CSV.

use std::io;

use canvass_parsing::ContestTable;
use snafu::prelude::*;

use crate::canvass::*;

/// Writes the table to a file, every field quoted.
pub fn write_contest_csv(table: &ContestTable, path: &str) -> CanvassResult<()> {
    let writer = builder()
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    write_table(table, writer)
}

/// Writes the table to the standard output, every field quoted.
pub fn write_contest_stdout(table: &ContestTable) -> CanvassResult<()> {
    let writer = builder().from_writer(io::stdout());
    write_table(table, writer)
}

// The title row has a single field while every other row has three more
// than the roster size, so the writer cannot enforce equal record lengths.
fn builder() -> csv::WriterBuilder {
    let mut builder = csv::WriterBuilder::new();
    builder
        .quote_style(csv::QuoteStyle::Always)
        .flexible(true);
    builder
}

fn write_table<W: io::Write>(
    table: &ContestTable,
    mut writer: csv::Writer<W>,
) -> CanvassResult<()> {
    writer
        .write_record([table.title.as_str()])
        .context(CsvWriteSnafu {})?;

    let mut header = vec![
        "Primary precinct ID".to_string(),
        "Secondary precinct ID".to_string(),
        "Precinct name".to_string(),
    ];
    header.extend(table.candidates.iter().map(|c| c.name.clone()));
    writer.write_record(&header).context(CsvWriteSnafu {})?;

    for row in &table.rows {
        let mut record = vec![
            row.primary_id.clone().unwrap_or_default(),
            row.secondary_id.clone().unwrap_or_default(),
            row.name.clone(),
        ];
        record.extend(row.votes.iter().map(|vote| vote.to_string()));
        writer.write_record(&record).context(CsvWriteSnafu {})?;
    }
    writer.flush().context(CsvFlushSnafu {})?;
    Ok(())
}
