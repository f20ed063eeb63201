use crate::model::{Cohort, Dataset};
use crate::report::{SummaryData, format_pct, format_speed, format_value};

/// Header and load diagnostics. Rendered as soon as the table is loaded, so
/// they are shown even when the statistics stage fails afterwards.
pub fn render_load_diagnostics(dataset: &Dataset) -> String {
    let mut out = String::new();

    out.push_str("Gait Speed Report (Parkinson's vs. Control)\n");
    out.push_str("===========================================\n\n");

    out.push_str(&format!(
        "Loaded dataset with {} rows ({} records) and {} columns\n",
        dataset.rows_read,
        dataset.len(),
        dataset.columns.len()
    ));
    out.push_str(&format!("Columns: {}\n", dataset.columns.join(", ")));
    out.push_str(&format!(
        "Load strategy: {} ({} dropped, {} over-wide lines skipped)\n",
        dataset.strategy, dataset.rows_dropped, dataset.lines_skipped
    ));
    if dataset.is_empty() {
        out.push_str("No usable records remained after dropping invalid rows\n");
    }

    out
}

/// Result block that follows the load diagnostics.
pub fn render_report_text(data: &SummaryData) -> String {
    let mut out = String::new();

    if data.input.unrecognized_group_rows > 0 {
        let values = data
            .input
            .unrecognized_group_values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>();
        out.push_str(&format!(
            "Rows with unrecognized Group values: {} (values: {})\n",
            data.input.unrecognized_group_rows,
            values.join(", ")
        ));
    }

    out.push_str("\nResults:\n");
    for cohort in Cohort::ALL {
        if let Some(c) = data.cohort(cohort) {
            out.push_str(&format!("Number of {} subjects: {}\n", c.label, c.n));
        }
    }
    for cohort in Cohort::ALL {
        if let Some(c) = data.cohort(cohort) {
            out.push_str(&format!(
                "Average speed ({}): {} m/s\n",
                c.label,
                format_speed(c.mean)
            ));
        }
    }
    out.push_str(&format!(
        "Percentage difference: {}%\n",
        format_pct(data.percent_difference)
    ));
    for cohort in Cohort::ALL {
        if let Some(c) = data.cohort(cohort) {
            out.push_str(&format!(
                "{} subjects below {} m/s: {} ({}%)\n",
                c.label,
                format_value(data.threshold),
                c.below_threshold,
                format_pct(c.below_threshold_pct)
            ));
        }
    }

    out
}
