use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::model::{ColumnSpec, Dataset, LoadStrategy};

pub mod fields;
pub mod recover;
pub mod source;
pub mod table;

use recover::recover_manual;
use source::read_source;
use table::{parse_skip_bad_lines, parse_strict};

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decompress {}: {source}", .path.display())]
    Decompress {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("required columns not found: {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },
    #[error("all load strategies failed: {reasons}")]
    AllStrategiesFailed { reasons: String },
}

/// Outcome of one rung of the loader ladder. `Failed` is structural and lets
/// the next strategy run; fatal problems come back as `Err(InputError)`.
#[derive(Debug)]
pub enum Attempt {
    Loaded(Dataset),
    Failed(String),
}

pub type StrategyFn = fn(&[u8], &ColumnSpec) -> Result<Attempt, InputError>;

pub const STRATEGIES: &[(LoadStrategy, StrategyFn)] = &[
    (LoadStrategy::Strict, parse_strict as StrategyFn),
    (LoadStrategy::SkipBadLines, parse_skip_bad_lines as StrategyFn),
    (LoadStrategy::ManualRecovery, recover_manual as StrategyFn),
];

pub fn load_dataset(spec: &ColumnSpec) -> Result<Dataset, InputError> {
    let bytes = read_source(&spec.path)?;
    debug!(path = %spec.path.display(), bytes = bytes.len(), "read input");
    load_dataset_from_bytes(&bytes, spec)
}

pub fn load_dataset_from_bytes(bytes: &[u8], spec: &ColumnSpec) -> Result<Dataset, InputError> {
    let mut reasons = Vec::new();
    for (strategy, attempt) in STRATEGIES {
        match attempt(bytes, spec)? {
            Attempt::Loaded(dataset) => {
                if !reasons.is_empty() {
                    info!(strategy = %strategy, "input recovered by fallback strategy");
                }
                return Ok(dataset);
            }
            Attempt::Failed(reason) => {
                warn!(strategy = %strategy, %reason, "load strategy failed; falling back");
                reasons.push(format!("{strategy}: {reason}"));
            }
        }
    }
    Err(InputError::AllStrategiesFailed {
        reasons: reasons.join("; "),
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
