use std::f64::consts::PI;

use tracing::debug;

use crate::model::Cohort;
use crate::pipeline::stage2_partition::Partition;
use crate::report::{min_max, sample_std_dev};

pub const DEFAULT_BINS: usize = 20;
/// Largest bin count accepted for `--bins`.
pub const MAX_BINS: usize = 1000;
pub const DENSITY_POINTS: usize = 200;
/// Bandwidth used when a cohort has no spread, in m/s.
pub const FALLBACK_BANDWIDTH: f64 = 0.1;

#[derive(Debug, Clone, Copy)]
pub struct Stage4Params {
    pub bins: usize,
    pub density: bool,
}

impl Default for Stage4Params {
    fn default() -> Self {
        Self {
            bins: DEFAULT_BINS,
            density: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `bins + 1` ascending edges shared by both cohorts.
    pub edges: Vec<f64>,
    pub parkinsons: Vec<usize>,
    pub control: Vec<usize>,
}

impl Histogram {
    pub fn counts(&self, cohort: Cohort) -> &[usize] {
        match cohort {
            Cohort::Parkinsons => &self.parkinsons,
            Cohort::Control => &self.control,
        }
    }

    pub fn bin_width(&self) -> f64 {
        match (self.edges.first(), self.edges.last()) {
            (Some(lo), Some(hi)) if self.edges.len() > 1 => {
                (hi - lo) / (self.edges.len() - 1) as f64
            }
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DensityCurve {
    pub cohort: Cohort,
    pub bandwidth: f64,
    /// `(speed, expected subjects per bin)` pairs.
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stage4Output {
    pub histogram: Histogram,
    pub densities: Vec<DensityCurve>,
}

impl Stage4Output {
    pub fn density(&self, cohort: Cohort) -> Option<&DensityCurve> {
        self.densities.iter().find(|d| d.cohort == cohort)
    }
}

pub fn run_stage4(partition: &Partition, params: &Stage4Params) -> Stage4Output {
    let bins = params.bins.max(1);
    let (lo, hi) = shared_range(&partition.parkinsons, &partition.control);
    let edges = bin_edges(lo, hi, bins);
    let histogram = Histogram {
        parkinsons: histogram_counts(&partition.parkinsons, &edges),
        control: histogram_counts(&partition.control, &edges),
        edges,
    };

    let mut densities = Vec::new();
    if params.density {
        let bin_width = histogram.bin_width();
        let grid = linspace(lo, hi, DENSITY_POINTS);
        for cohort in Cohort::ALL {
            let speeds = partition.speeds(cohort);
            if speeds.is_empty() {
                continue;
            }
            let bandwidth = scott_bandwidth(speeds);
            let scale = speeds.len() as f64 * bin_width;
            let points = grid
                .iter()
                .zip(gaussian_kde(speeds, bandwidth, &grid))
                .map(|(&x, d)| (x, d * scale))
                .collect();
            debug!(cohort = %cohort, bandwidth, "estimated density");
            densities.push(DensityCurve {
                cohort,
                bandwidth,
                points,
            });
        }
    }

    Stage4Output {
        histogram,
        densities,
    }
}

/// Combined min/max of both cohorts, widened by 0.5 on each side when every
/// value is the same.
pub fn shared_range(a: &[f64], b: &[f64]) -> (f64, f64) {
    let range = match (min_max(a), min_max(b)) {
        (Some((alo, ahi)), Some((blo, bhi))) => Some((alo.min(blo), ahi.max(bhi))),
        (Some(r), None) | (None, Some(r)) => Some(r),
        (None, None) => None,
    };
    match range {
        Some((lo, hi)) if hi > lo => (lo, hi),
        Some((v, _)) => (v - 0.5, v + 0.5),
        None => (0.0, 1.0),
    }
}

pub fn bin_edges(lo: f64, hi: f64, bins: usize) -> Vec<f64> {
    let width = (hi - lo) / bins as f64;
    let mut edges: Vec<f64> = (0..bins).map(|i| lo + width * i as f64).collect();
    edges.push(hi);
    edges
}

/// Counts per bin; bins are half-open except the last, which includes `hi`.
pub fn histogram_counts(values: &[f64], edges: &[f64]) -> Vec<usize> {
    let bins = edges.len().saturating_sub(1);
    let mut counts = vec![0usize; bins];
    if bins == 0 {
        return counts;
    }
    let lo = edges[0];
    let hi = edges[bins];
    let width = (hi - lo) / bins as f64;
    for &v in values {
        if v < lo || v > hi {
            continue;
        }
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
}

/// Scott's rule of thumb, `sigma * n^(-1/5)`.
pub fn scott_bandwidth(values: &[f64]) -> f64 {
    let sigma = sample_std_dev(values);
    if sigma <= 0.0 || values.is_empty() {
        return FALLBACK_BANDWIDTH;
    }
    sigma * (values.len() as f64).powf(-0.2)
}

pub fn gaussian_kde(values: &[f64], bandwidth: f64, grid: &[f64]) -> Vec<f64> {
    if values.is_empty() || bandwidth <= 0.0 {
        return vec![0.0; grid.len()];
    }
    let norm = 1.0 / (values.len() as f64 * bandwidth * (2.0 * PI).sqrt());
    grid.iter()
        .map(|&x| {
            let sum: f64 = values
                .iter()
                .map(|&v| {
                    let u = (x - v) / bandwidth;
                    (-0.5 * u * u).exp()
                })
                .sum();
            sum * norm
        })
        .collect()
}

pub fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (n - 1) as f64;
            (0..n).map(|i| lo + step * i as f64).collect()
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_density.rs"]
mod tests;
