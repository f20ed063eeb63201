use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::model::{LoadStrategy, Record};
use crate::pipeline::stage2_partition::run_stage2;
use crate::pipeline::stage3_stats::run_stage3;
use crate::pipeline::stage4_density::{Stage4Params, run_stage4};
use crate::report::text::render_load_diagnostics;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("kira_gaitspeed_report_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn sample_dataset() -> Dataset {
    Dataset {
        records: vec![
            Record { group: 1, speed: 0.8 },
            Record { group: 1, speed: 1.2 },
            Record { group: 2, speed: 1.0 },
            Record { group: 2, speed: 1.4 },
            Record { group: 7, speed: 1.1 },
        ],
        columns: vec!["Group".to_string(), "Speed_01".to_string()],
        rows_read: 6,
        rows_dropped: 1,
        lines_skipped: 0,
        strategy: LoadStrategy::Strict,
    }
}

fn with_input<T>(f: impl FnOnce(&Stage5Input<'_>) -> T) -> T {
    let dataset = sample_dataset();
    let partition = run_stage2(&dataset);
    let stats = run_stage3(&partition, 1.0).unwrap();
    let distribution = run_stage4(&partition, &Stage4Params::default());
    let path = PathBuf::from("demographics.txt");
    let input = Stage5Input {
        input_path: &path,
        dataset: &dataset,
        partition: &partition,
        stats: &stats,
        distribution: &distribution,
        tool_name: "kira-gaitspeed".to_string(),
        tool_version: "0.1.0".to_string(),
    };
    f(&input)
}

#[test]
fn test_build_summary() {
    let summary = with_input(build_summary);
    assert_eq!(summary.input.records, 5);
    assert_eq!(summary.input.unrecognized_group_rows, 1);
    assert_eq!(summary.input.unrecognized_group_values, vec![7]);
    assert_eq!(summary.cohorts.len(), 2);
    assert_eq!(summary.cohorts[0].cohort, Cohort::Parkinsons);
    assert_eq!(summary.cohorts[0].below_threshold, 1);
    assert_eq!(summary.cohorts[1].below_threshold, 0);
    assert_eq!(summary.histogram.parkinsons.iter().sum::<usize>(), 2);
}

#[test]
fn test_text_report_lines() {
    let text = with_input(|input| render_report_text(&build_summary(input)));
    assert!(!text.contains("Loaded dataset"));
    assert!(text.contains("Average speed (Parkinson's): 1.00 m/s"));
    assert!(text.contains("Average speed (Control): 1.20 m/s"));
    assert!(text.contains("Percentage difference: 16.7%"));
    assert!(text.contains("Parkinson's subjects below 1.0 m/s: 1 (50.0%)"));
    assert!(text.contains("Control subjects below 1.0 m/s: 0 (0.0%)"));
    assert!(text.contains("Rows with unrecognized Group values: 1 (values: 7)"));
}

#[test]
fn test_write_all_reports() {
    let dir = make_temp_dir();
    let written = with_input(|input| {
        let summary = build_summary(input);
        write_reports(input, &summary, &dir, ReportFormat::All).unwrap()
    });
    assert_eq!(written.len(), 3);

    let json = fs::read_to_string(dir.join(SUMMARY_JSON)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["input"]["strategy"], "strict");
    assert_eq!(value["cohorts"][0]["cohort"], "parkinsons");
    assert_eq!(value["cohorts"][1]["n"], 2);
    let pct = value["percent_difference"].as_f64().unwrap();
    assert!((pct - 16.666_666).abs() < 1e-3);

    let html = fs::read_to_string(dir.join(CHART_HTML)).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<script type=\"application/json\" id=\"gait-data\">"));
    assert!(html.contains("\"speeds\":[0.8,1.2]"));
    assert!(html.contains("<polyline"));
    assert!(html.contains("Parkinson&#39;s"));

    let text = fs::read_to_string(dir.join(REPORT_TXT)).unwrap();
    let loaded = text.find("Loaded dataset with 6 rows (5 records)").unwrap();
    let results = text.find("Percentage difference: 16.7%").unwrap();
    assert!(loaded < results);
    assert!(html.contains("&lt; 1.0 m/s"));
}

#[test]
fn test_format_selection() {
    let dir = make_temp_dir();
    let json_only = with_input(|input| {
        let summary = build_summary(input);
        write_reports(input, &summary, &dir.join("json"), ReportFormat::Json).unwrap()
    });
    assert_eq!(json_only, vec![dir.join("json").join(SUMMARY_JSON)]);

    let none = with_input(|input| {
        let summary = build_summary(input);
        write_reports(input, &summary, &dir.join("none"), ReportFormat::None).unwrap()
    });
    assert!(none.is_empty());
    assert!(!dir.join("none").exists());
}

#[test]
fn test_load_diagnostics_count_rows_and_records() {
    let text = render_load_diagnostics(&sample_dataset());
    assert!(text.contains("Loaded dataset with 6 rows (5 records) and 2 columns"));
    assert!(text.contains("Columns: Group, Speed_01"));
    assert!(text.contains("Load strategy: strict (1 dropped, 0 over-wide lines skipped)"));
    assert!(!text.contains("No usable records"));
}

#[test]
fn test_load_diagnostics_flag_empty_dataset() {
    let dataset = Dataset {
        records: Vec::new(),
        rows_read: 2,
        rows_dropped: 2,
        strategy: LoadStrategy::ManualRecovery,
        ..sample_dataset()
    };
    let text = render_load_diagnostics(&dataset);
    assert!(text.contains("Loaded dataset with 2 rows (0 records) and 2 columns"));
    assert!(text.contains("Load strategy: manual-recovery"));
    assert!(text.contains("No usable records remained after dropping invalid rows"));
}
