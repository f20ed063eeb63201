use thiserror::Error;
use tracing::debug;

use crate::input::fields::{content_lines, parse_group, parse_speed, split_header, split_row};
use crate::input::{Attempt, InputError};
use crate::model::{ColumnSpec, Dataset, LoadStrategy, Record};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("input is not valid UTF-8 (at byte {0})")]
    NotUtf8(usize),
    #[error("input has no header line")]
    NoHeader,
    #[error("expected {expected} fields on line {line}, saw {found}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowPolicy {
    Reject,
    Skip,
}

/// Header plus rows, every row padded to the header width with empty fields.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<(usize, Vec<String>)>,
    pub skipped_lines: usize,
}

impl RawTable {
    pub fn parse(
        text: &str,
        delimiter: char,
        overflow: OverflowPolicy,
    ) -> Result<Self, TableError> {
        let mut lines = content_lines(text);
        let (_, header_line) = lines.next().ok_or(TableError::NoHeader)?;
        let columns = split_header(header_line, delimiter);
        let width = columns.len();

        let mut rows = Vec::new();
        let mut skipped_lines = 0usize;
        for (line_no, line) in lines {
            let fields = split_row(line, delimiter);
            if fields.len() > width {
                match overflow {
                    OverflowPolicy::Reject => {
                        return Err(TableError::RaggedRow {
                            line: line_no,
                            expected: width,
                            found: fields.len(),
                        });
                    }
                    OverflowPolicy::Skip => {
                        debug!(
                            line = line_no,
                            fields = fields.len(),
                            expected = width,
                            "skipping over-wide line"
                        );
                        skipped_lines += 1;
                        continue;
                    }
                }
            }
            let mut row: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
            row.resize(width, String::new());
            rows.push((line_no, row));
        }

        Ok(Self {
            columns,
            rows,
            skipped_lines,
        })
    }
}

pub fn parse_strict(bytes: &[u8], spec: &ColumnSpec) -> Result<Attempt, InputError> {
    parse_structured(bytes, spec, OverflowPolicy::Reject, LoadStrategy::Strict)
}

pub fn parse_skip_bad_lines(bytes: &[u8], spec: &ColumnSpec) -> Result<Attempt, InputError> {
    parse_structured(bytes, spec, OverflowPolicy::Skip, LoadStrategy::SkipBadLines)
}

fn parse_structured(
    bytes: &[u8],
    spec: &ColumnSpec,
    overflow: OverflowPolicy,
    strategy: LoadStrategy,
) -> Result<Attempt, InputError> {
    let text = match std::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            return Ok(Attempt::Failed(
                TableError::NotUtf8(e.valid_up_to()).to_string(),
            ));
        }
    };
    let table = match RawTable::parse(text, spec.delimiter, overflow) {
        Ok(table) => table,
        Err(e) => return Ok(Attempt::Failed(e.to_string())),
    };
    table_to_dataset(table, spec, strategy).map(Attempt::Loaded)
}

/// Coerces the group and speed columns of a parsed table; rows where either
/// field is empty or unparseable are dropped.
pub fn table_to_dataset(
    table: RawTable,
    spec: &ColumnSpec,
    strategy: LoadStrategy,
) -> Result<Dataset, InputError> {
    let (group_idx, speed_idx) = spec
        .locate(&table.columns)
        .map_err(|missing| InputError::MissingColumns { missing })?;

    let rows_read = table.rows.len();
    let mut records = Vec::with_capacity(rows_read);
    let mut rows_dropped = 0usize;
    for (line_no, row) in &table.rows {
        match (parse_group(&row[group_idx]), parse_speed(&row[speed_idx])) {
            (Some(group), Some(speed)) => records.push(Record { group, speed }),
            _ => {
                debug!(line = line_no, "dropping row with missing or non-numeric fields");
                rows_dropped += 1;
            }
        }
    }

    Ok(Dataset {
        records,
        columns: table.columns,
        rows_read,
        rows_dropped,
        lines_skipped: table.skipped_lines,
        strategy,
    })
}
