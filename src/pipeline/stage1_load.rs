use tracing::info;

use crate::input::{InputError, load_dataset};
use crate::model::{ColumnSpec, Dataset};

pub fn run_stage1(spec: &ColumnSpec) -> Result<Dataset, InputError> {
    let dataset = load_dataset(spec)?;
    info!(
        strategy = %dataset.strategy,
        rows_read = dataset.rows_read,
        records = dataset.len(),
        rows_dropped = dataset.rows_dropped,
        lines_skipped = dataset.lines_skipped,
        "loaded dataset"
    );
    info!(
        n_columns = dataset.columns.len(),
        "columns: {}",
        dataset.columns.join(", ")
    );
    Ok(dataset)
}
