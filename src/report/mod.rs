use serde::Serialize;

use crate::model::{Cohort, LoadStrategy};

pub mod html;
pub mod json;
pub mod text;

#[derive(Debug, Clone, Serialize)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputSummary {
    pub path: String,
    pub strategy: LoadStrategy,
    pub rows_read: usize,
    pub rows_dropped: usize,
    pub lines_skipped: usize,
    pub records: usize,
    pub columns: Vec<String>,
    pub unrecognized_group_rows: usize,
    pub unrecognized_group_values: Vec<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CohortSummary {
    pub cohort: Cohort,
    pub label: &'static str,
    pub group_value: i64,
    pub n: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub below_threshold: usize,
    pub below_threshold_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistogramSummary {
    pub edges: Vec<f64>,
    pub parkinsons: Vec<usize>,
    pub control: Vec<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryData {
    pub tool: ToolMeta,
    pub input: InputSummary,
    pub threshold: f64,
    pub cohorts: Vec<CohortSummary>,
    pub percent_difference: f64,
    pub histogram: HistogramSummary,
}

impl SummaryData {
    pub fn cohort(&self, cohort: Cohort) -> Option<&CohortSummary> {
        self.cohorts.iter().find(|c| c.cohort == cohort)
    }
}

pub fn format_speed(v: f64) -> String {
    format!("{:.2}", v)
}

pub fn format_pct(v: f64) -> String {
    format!("{:.1}", v)
}

/// Shortest form that still shows a decimal point, so `1.0` stays `1.0`.
pub fn format_value(v: f64) -> String {
    if v.fract() == 0.0 && v.is_finite() {
        format!("{:.1}", v)
    } else {
        format!("{}", v)
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator); 0 for fewer than two values.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
