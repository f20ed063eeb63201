use std::borrow::Cow;

use tracing::debug;

use crate::input::fields::{content_lines, parse_group, parse_speed, split_header, split_row};
use crate::input::{Attempt, InputError};
use crate::model::{ColumnSpec, Dataset, LoadStrategy, Record};

/// Last rung of the ladder: line-by-line recovery over lossily decoded text.
/// Only the group and speed positions matter, so rows of any width are read
/// as long as they reach both columns.
pub fn recover_manual(bytes: &[u8], spec: &ColumnSpec) -> Result<Attempt, InputError> {
    let text: Cow<'_, str> = String::from_utf8_lossy(bytes);
    let mut lines = content_lines(&text);
    let Some((_, header_line)) = lines.next() else {
        return Ok(Attempt::Failed("input has no header line".to_string()));
    };
    let columns = split_header(header_line, spec.delimiter);
    let (group_idx, speed_idx) = spec
        .locate(&columns)
        .map_err(|missing| InputError::MissingColumns { missing })?;
    let min_fields = group_idx.max(speed_idx) + 1;

    let mut records = Vec::new();
    let mut rows_read = 0usize;
    let mut rows_dropped = 0usize;
    for (line_no, line) in lines {
        rows_read += 1;
        let fields = split_row(line, spec.delimiter);
        if fields.len() < min_fields {
            debug!(line = line_no, fields = fields.len(), "dropping short row");
            rows_dropped += 1;
            continue;
        }
        match (parse_group(fields[group_idx]), parse_speed(fields[speed_idx])) {
            (Some(group), Some(speed)) => records.push(Record { group, speed }),
            _ => {
                debug!(line = line_no, "dropping row with missing or non-numeric fields");
                rows_dropped += 1;
            }
        }
    }

    Ok(Attempt::Loaded(Dataset {
        records,
        columns,
        rows_read,
        rows_dropped,
        lines_skipped: 0,
        strategy: LoadStrategy::ManualRecovery,
    }))
}
