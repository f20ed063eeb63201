use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use thiserror::Error;
use tracing::info;

use crate::model::{Cohort, Dataset};
use crate::pipeline::stage2_partition::Partition;
use crate::pipeline::stage3_stats::{CohortStats, Stage3Output};
use crate::pipeline::stage4_density::Stage4Output;
use crate::report::html::{
    CONTROL_COLOR, ChartData, ChartSeries, HtmlError, PARKINSONS_COLOR, render_html,
};
use crate::report::json::render_summary_json;
use crate::report::text::{render_load_diagnostics, render_report_text};
use crate::report::{CohortSummary, HistogramSummary, InputSummary, SummaryData, ToolMeta};

pub const REPORT_TXT: &str = "report.txt";
pub const SUMMARY_JSON: &str = "summary.json";
pub const CHART_HTML: &str = "gait_speed.html";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    All,
    Text,
    Json,
    Html,
    None,
}

impl ReportFormat {
    fn wants_text(self) -> bool {
        matches!(self, ReportFormat::All | ReportFormat::Text)
    }

    fn wants_json(self) -> bool {
        matches!(self, ReportFormat::All | ReportFormat::Json)
    }

    fn wants_html(self) -> bool {
        matches!(self, ReportFormat::All | ReportFormat::Html)
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("HTML error: {0}")]
    Html(#[from] HtmlError),
}

#[derive(Debug, Clone)]
pub struct Stage5Input<'a> {
    pub input_path: &'a Path,
    pub dataset: &'a Dataset,
    pub partition: &'a Partition,
    pub stats: &'a Stage3Output,
    pub distribution: &'a Stage4Output,
    pub tool_name: String,
    pub tool_version: String,
}

pub fn build_summary(input: &Stage5Input<'_>) -> SummaryData {
    let dataset = input.dataset;
    let histogram = &input.distribution.histogram;
    SummaryData {
        tool: ToolMeta {
            name: input.tool_name.clone(),
            version: input.tool_version.clone(),
        },
        input: InputSummary {
            path: input.input_path.display().to_string(),
            strategy: dataset.strategy,
            rows_read: dataset.rows_read,
            rows_dropped: dataset.rows_dropped,
            lines_skipped: dataset.lines_skipped,
            records: dataset.len(),
            columns: dataset.columns.clone(),
            unrecognized_group_rows: input.partition.unrecognized_rows,
            unrecognized_group_values: input
                .partition
                .unrecognized_values
                .iter()
                .copied()
                .collect(),
        },
        threshold: input.stats.threshold,
        cohorts: Cohort::ALL
            .iter()
            .map(|&c| cohort_summary(input.stats.cohort(c)))
            .collect(),
        percent_difference: input.stats.percent_difference,
        histogram: HistogramSummary {
            edges: histogram.edges.clone(),
            parkinsons: histogram.parkinsons.clone(),
            control: histogram.control.clone(),
        },
    }
}

fn cohort_summary(stats: &CohortStats) -> CohortSummary {
    CohortSummary {
        cohort: stats.cohort,
        label: stats.cohort.label(),
        group_value: stats.cohort.group_value(),
        n: stats.n,
        mean: stats.mean,
        std_dev: stats.std_dev,
        min: stats.min,
        max: stats.max,
        below_threshold: stats.below,
        below_threshold_pct: stats.below_pct,
    }
}

/// Writes the requested artifacts into `out_dir` and returns their paths.
pub fn write_reports(
    input: &Stage5Input<'_>,
    summary: &SummaryData,
    out_dir: &Path,
    format: ReportFormat,
) -> Result<Vec<PathBuf>, ReportError> {
    let mut written = Vec::new();
    if format == ReportFormat::None {
        return Ok(written);
    }
    fs::create_dir_all(out_dir)?;

    if format.wants_text() {
        let path = out_dir.join(REPORT_TXT);
        let text = render_load_diagnostics(input.dataset) + &render_report_text(summary);
        write_text(&path, &text)?;
        written.push(path);
    }

    if format.wants_json() {
        let path = out_dir.join(SUMMARY_JSON);
        write_text(&path, &render_summary_json(summary)?)?;
        written.push(path);
    }

    if format.wants_html() {
        let path = out_dir.join(CHART_HTML);
        let chart = chart_data(input);
        write_text(&path, &render_html(summary, &chart)?)?;
        written.push(path);
    }

    for path in &written {
        info!(path = %path.display(), "wrote report");
    }
    Ok(written)
}

fn chart_data<'a>(input: &Stage5Input<'a>) -> ChartData<'a> {
    let distribution = input.distribution;
    let series = |cohort: Cohort, color: &'static str| ChartSeries {
        label: cohort.label(),
        color,
        speeds: input.partition.speeds(cohort),
        counts: distribution.histogram.counts(cohort),
        density: distribution.density(cohort).map(|d| d.points.as_slice()),
    };
    ChartData {
        edges: &distribution.histogram.edges,
        threshold: input.stats.threshold,
        series: [
            series(Cohort::Parkinsons, PARKINSONS_COLOR),
            series(Cohort::Control, CONTROL_COLOR),
        ],
    }
}

fn write_text(path: &Path, text: &str) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(text.as_bytes())?;
    w.flush()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_report.rs"]
mod tests;
