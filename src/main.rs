mod input;
mod logging;
mod model;
mod pipeline;
mod report;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use crate::input::InputError;
use crate::model::ColumnSpec;
use crate::model::columns::{DEFAULT_GROUP_COLUMN, DEFAULT_SPEED_COLUMN};
use crate::pipeline::stage1_load::run_stage1;
use crate::pipeline::stage2_partition::run_stage2;
use crate::pipeline::stage3_stats::{DEFAULT_THRESHOLD, StatsError, run_stage3};
use crate::pipeline::stage4_density::{DEFAULT_BINS, MAX_BINS, Stage4Params, run_stage4};
use crate::pipeline::stage5_report::{
    ReportError, ReportFormat, Stage5Input, build_summary, write_reports,
};
use crate::report::text::{render_load_diagnostics, render_report_text};

#[derive(Debug, Parser)]
#[command(
    name = "kira-gaitspeed",
    version,
    about = "Gait speed comparison between Parkinson's and control cohorts"
)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load a demographics table and compare gait speed between cohorts
    Run(RunArgs),
}

#[derive(Debug, Clone, Args)]
struct RunArgs {
    /// Tab-separated demographics table (.txt, .tsv, optionally .gz)
    #[arg(long)]
    input: PathBuf,

    /// Directory for report artifacts; nothing is written when omitted
    #[arg(long)]
    out: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = ReportFormat::All)]
    format: ReportFormat,

    #[arg(long, default_value = DEFAULT_GROUP_COLUMN)]
    group_column: String,

    #[arg(long, default_value = DEFAULT_SPEED_COLUMN)]
    speed_column: String,

    /// Clinical speed threshold in m/s; subjects strictly below it are counted
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f64,

    /// Histogram bins shared by both cohorts
    #[arg(long, default_value_t = DEFAULT_BINS)]
    bins: usize,

    /// Skip the kernel density overlay
    #[arg(long)]
    no_density: bool,
}

#[derive(Debug, Clone)]
struct RunConfig {
    columns: ColumnSpec,
    out_dir: Option<PathBuf>,
    format: ReportFormat,
    threshold: f64,
    stage4: Stage4Params,
}

#[derive(Debug, Error)]
enum RunError {
    #[error("invalid arguments: {0}")]
    Config(String),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Stats(#[from] StatsError),
    #[error(transparent)]
    Report(#[from] ReportError),
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let result = match cli.command {
        Command::Run(args) => build_config(args).and_then(|config| run(&config)),
    };
    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn build_config(args: RunArgs) -> Result<RunConfig, RunError> {
    if !args.threshold.is_finite() || args.threshold <= 0.0 {
        return Err(RunError::Config(format!(
            "--threshold must be a positive number, got {}",
            args.threshold
        )));
    }
    if args.bins == 0 || args.bins > MAX_BINS {
        return Err(RunError::Config(format!(
            "--bins must be between 1 and {MAX_BINS}, got {}",
            args.bins
        )));
    }
    if args.group_column.trim().is_empty() || args.speed_column.trim().is_empty() {
        return Err(RunError::Config("column names must not be empty".to_string()));
    }
    Ok(RunConfig {
        columns: ColumnSpec::new(&args.input)
            .with_columns(args.group_column.trim(), args.speed_column.trim()),
        out_dir: args.out,
        format: args.format,
        threshold: args.threshold,
        stage4: Stage4Params {
            bins: args.bins,
            density: !args.no_density,
        },
    })
}

fn run(config: &RunConfig) -> Result<(), RunError> {
    let dataset = run_stage1(&config.columns)?;
    print!("{}", render_load_diagnostics(&dataset));

    let partition = run_stage2(&dataset);
    let stats = run_stage3(&partition, config.threshold)?;
    let distribution = run_stage4(&partition, &config.stage4);

    let input = Stage5Input {
        input_path: &config.columns.path,
        dataset: &dataset,
        partition: &partition,
        stats: &stats,
        distribution: &distribution,
        tool_name: env!("CARGO_PKG_NAME").to_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
    };
    let summary = build_summary(&input);
    print!("{}", render_report_text(&summary));

    if let Some(out_dir) = &config.out_dir {
        write_reports(&input, &summary, out_dir, config.format)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
