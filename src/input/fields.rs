const BOM: char = '\u{feff}';

/// Non-blank lines with their 1-based line numbers. `str::lines` already
/// strips `\n` and `\r\n`.
pub fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
        .filter(|(_, line)| !line.trim().is_empty())
}

pub fn split_header(line: &str, delimiter: char) -> Vec<String> {
    line.trim_start_matches(BOM)
        .split(delimiter)
        .map(|s| s.trim().to_string())
        .collect()
}

/// Splits a data line and drops trailing empty fields, so a stray delimiter
/// at the end of a row does not make it wider than the header.
pub fn split_row(line: &str, delimiter: char) -> Vec<&str> {
    let mut fields: Vec<&str> = line.split(delimiter).collect();
    while fields.len() > 1 && fields.last().is_some_and(|f| f.trim().is_empty()) {
        fields.pop();
    }
    fields
}

pub fn parse_group(field: &str) -> Option<i64> {
    let field = field.trim();
    if field.is_empty() {
        return None;
    }
    field.parse::<i64>().ok()
}

pub fn parse_speed(field: &str) -> Option<f64> {
    let field = field.trim();
    if field.is_empty() {
        return None;
    }
    field.parse::<f64>().ok().filter(|v| v.is_finite())
}
