use thiserror::Error;
use tracing::info;

use crate::model::Cohort;
use crate::pipeline::stage2_partition::Partition;
use crate::report::{mean, min_max, sample_std_dev};

/// Clinical reference speed in m/s.
pub const DEFAULT_THRESHOLD: f64 = 1.0;

#[derive(Debug, Error, PartialEq)]
pub enum StatsError {
    #[error("no data found for the {0} cohort")]
    EmptyCohort(Cohort),
    #[error("control mean speed is zero; percentage difference is undefined")]
    ZeroControlMean,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CohortStats {
    pub cohort: Cohort,
    pub n: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// Subjects with `speed < threshold`.
    pub below: usize,
    pub below_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stage3Output {
    pub parkinsons: CohortStats,
    pub control: CohortStats,
    pub threshold: f64,
    pub percent_difference: f64,
}

impl Stage3Output {
    pub fn cohort(&self, cohort: Cohort) -> &CohortStats {
        match cohort {
            Cohort::Parkinsons => &self.parkinsons,
            Cohort::Control => &self.control,
        }
    }
}

pub fn run_stage3(partition: &Partition, threshold: f64) -> Result<Stage3Output, StatsError> {
    let parkinsons = cohort_stats(
        Cohort::Parkinsons,
        partition.speeds(Cohort::Parkinsons),
        threshold,
    )?;
    let control = cohort_stats(Cohort::Control, partition.speeds(Cohort::Control), threshold)?;
    let percent_difference = percent_difference(control.mean, parkinsons.mean)?;

    info!(
        parkinsons_mean = parkinsons.mean,
        control_mean = control.mean,
        percent_difference,
        "computed cohort statistics"
    );

    Ok(Stage3Output {
        parkinsons,
        control,
        threshold,
        percent_difference,
    })
}

pub fn cohort_stats(
    cohort: Cohort,
    speeds: &[f64],
    threshold: f64,
) -> Result<CohortStats, StatsError> {
    let (min, max) = min_max(speeds).ok_or(StatsError::EmptyCohort(cohort))?;
    let n = speeds.len();
    let below = speeds.iter().filter(|&&v| v < threshold).count();
    Ok(CohortStats {
        cohort,
        n,
        mean: mean(speeds),
        std_dev: sample_std_dev(speeds),
        min,
        max,
        below,
        below_pct: below as f64 / n as f64 * 100.0,
    })
}

/// `(control - parkinsons) / control * 100`.
pub fn percent_difference(control_mean: f64, parkinsons_mean: f64) -> Result<f64, StatsError> {
    if control_mean == 0.0 {
        return Err(StatsError::ZeroControlMean);
    }
    Ok((control_mean - parkinsons_mean) / control_mean * 100.0)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_stats.rs"]
mod tests;
