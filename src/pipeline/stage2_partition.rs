use std::collections::BTreeSet;

use tracing::warn;

use crate::model::{Cohort, Dataset};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    pub parkinsons: Vec<f64>,
    pub control: Vec<f64>,
    pub unrecognized_rows: usize,
    pub unrecognized_values: BTreeSet<i64>,
}

impl Partition {
    pub fn speeds(&self, cohort: Cohort) -> &[f64] {
        match cohort {
            Cohort::Parkinsons => &self.parkinsons,
            Cohort::Control => &self.control,
        }
    }
}

/// Splits records by cohort, keeping input order. Group values outside the
/// known mapping are excluded from both cohorts and counted.
pub fn run_stage2(dataset: &Dataset) -> Partition {
    let mut out = Partition::default();
    for record in &dataset.records {
        match record.cohort() {
            Some(Cohort::Parkinsons) => out.parkinsons.push(record.speed),
            Some(Cohort::Control) => out.control.push(record.speed),
            None => {
                out.unrecognized_rows += 1;
                out.unrecognized_values.insert(record.group);
            }
        }
    }
    if out.unrecognized_rows > 0 {
        warn!(
            rows = out.unrecognized_rows,
            values = ?out.unrecognized_values,
            "excluding rows with unrecognized Group values"
        );
    }
    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_partition.rs"]
mod tests;
