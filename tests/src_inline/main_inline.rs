use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};

use clap::Parser;

use super::*;
use crate::model::Cohort;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("kira_gaitspeed_main_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn run_args(extra: &[&str]) -> RunArgs {
    let mut argv = vec!["kira-gaitspeed", "run", "--input", "demographics.txt"];
    argv.extend_from_slice(extra);
    let cli = Cli::try_parse_from(argv).unwrap();
    match cli.command {
        Command::Run(args) => args,
    }
}

#[test]
fn test_parse_args_defaults() {
    let args = run_args(&[]);
    assert_eq!(args.format, ReportFormat::All);
    assert_eq!(args.group_column, "Group");
    assert_eq!(args.speed_column, "Speed_01");
    assert_eq!(args.threshold, 1.0);
    assert_eq!(args.bins, 20);
    assert!(!args.no_density);
    assert!(args.out.is_none());
}

#[test]
fn test_parse_args_overrides() {
    let args = run_args(&[
        "--out",
        "out",
        "--format",
        "html",
        "--threshold",
        "0.9",
        "--bins",
        "12",
        "--no-density",
        "--speed-column",
        "Speed_02",
    ]);
    let config = build_config(args).unwrap();
    assert_eq!(config.format, ReportFormat::Html);
    assert_eq!(config.out_dir, Some(PathBuf::from("out")));
    assert_eq!(config.threshold, 0.9);
    assert_eq!(config.stage4.bins, 12);
    assert!(!config.stage4.density);
    assert_eq!(config.columns.speed_column, "Speed_02");
    assert_eq!(config.columns.path, PathBuf::from("demographics.txt"));
}

#[test]
fn test_parse_args_rejects_unknown_format() {
    let argv = ["kira-gaitspeed", "run", "--input", "x.txt", "--format", "pdf"];
    assert!(Cli::try_parse_from(argv).is_err());
}

#[test]
fn test_build_config_validation() {
    assert!(matches!(
        build_config(run_args(&["--threshold", "0"])),
        Err(RunError::Config(_))
    ));
    assert!(matches!(
        build_config(run_args(&["--bins", "0"])),
        Err(RunError::Config(_))
    ));
}

#[test]
fn test_build_config_caps_bins() {
    assert!(build_config(run_args(&["--bins", "1000"])).is_ok());
    let err = build_config(run_args(&["--bins", "100000"])).unwrap_err();
    assert!(matches!(err, RunError::Config(_)));
    assert!(err.to_string().contains("between 1 and 1000"));
}

#[test]
fn test_run_end_to_end() {
    let dir = make_temp_dir();
    let input = dir.join("demographics.txt");
    fs::write(
        &input,
        "ID\tGroup\tSpeed_01\nGaPt1\t1\t0.8\nGaPt2\t1\t1.2\nGaCo1\t2\t1.0\nGaCo2\t2\t1.4\nGaCo3\t2\t\n",
    )
    .unwrap();
    let out = dir.join("out");
    let args = run_args(&["--out", out.to_str().unwrap()]);
    let config = RunConfig {
        columns: ColumnSpec::new(&input),
        ..build_config(args).unwrap()
    };
    run(&config).unwrap();
    assert!(out.join("report.txt").exists());
    assert!(out.join("summary.json").exists());
    assert!(out.join("gait_speed.html").exists());
}

#[test]
fn test_run_fails_without_control_rows() {
    let dir = make_temp_dir();
    let input = dir.join("demographics.txt");
    fs::write(&input, "Group\tSpeed_01\n1\t0.8\n1\t1.2\n").unwrap();
    let config = RunConfig {
        columns: ColumnSpec::new(&input),
        ..build_config(run_args(&[])).unwrap()
    };
    let err = run(&config).unwrap_err();
    assert!(matches!(
        err,
        RunError::Stats(StatsError::EmptyCohort(Cohort::Control))
    ));
}

#[test]
fn test_run_fails_on_missing_columns() {
    let dir = make_temp_dir();
    let input = dir.join("demographics.txt");
    fs::write(&input, "ID\tSpeed_01\nGaPt1\t0.8\n").unwrap();
    let config = RunConfig {
        columns: ColumnSpec::new(&input),
        ..build_config(run_args(&[])).unwrap()
    };
    let err = run(&config).unwrap_err();
    assert!(matches!(
        err,
        RunError::Input(InputError::MissingColumns { .. })
    ));
    assert!(err.to_string().contains("required columns not found"));
}
