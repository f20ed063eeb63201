use super::*;

fn partition(parkinsons: &[f64], control: &[f64]) -> Partition {
    Partition {
        parkinsons: parkinsons.to_vec(),
        control: control.to_vec(),
        ..Partition::default()
    }
}

#[test]
fn test_histogram_counts_sum_to_cohort_size() {
    let p = partition(
        &[0.36, 0.642, 0.908, 1.046, 1.261, 1.369],
        &[0.906, 1.075, 1.24, 1.515, 1.542],
    );
    let out = run_stage4(&p, &Stage4Params::default());
    assert_eq!(out.histogram.edges.len(), DEFAULT_BINS + 1);
    assert_eq!(out.histogram.parkinsons.iter().sum::<usize>(), 6);
    assert_eq!(out.histogram.control.iter().sum::<usize>(), 5);
    assert_eq!(out.histogram.edges[0], 0.36);
    assert_eq!(*out.histogram.edges.last().unwrap(), 1.542);
    // 1.515 and the range maximum 1.542 share the closed last bin.
    assert_eq!(out.histogram.control[DEFAULT_BINS - 1], 2);
    assert_eq!(out.histogram.parkinsons[0], 1);
}

#[test]
fn test_shared_range_widens_constant_data() {
    assert_eq!(shared_range(&[1.0, 1.0], &[1.0]), (0.5, 1.5));
    assert_eq!(shared_range(&[], &[]), (0.0, 1.0));
    assert_eq!(shared_range(&[0.7], &[1.3, 0.9]), (0.7, 1.3));
}

#[test]
fn test_histogram_counts_bins() {
    let edges = bin_edges(0.0, 1.0, 4);
    assert_eq!(edges, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    let counts = histogram_counts(&[0.0, 0.1, 0.25, 0.6, 1.0, 1.2], &edges);
    assert_eq!(counts, vec![2, 1, 1, 1]);
}

#[test]
fn test_kde_integrates_to_one() {
    let values = [0.8, 0.95, 1.0, 1.1, 1.3];
    let h = scott_bandwidth(&values);
    let grid = linspace(-1.0, 3.0, 4001);
    let density = gaussian_kde(&values, h, &grid);
    let step = grid[1] - grid[0];
    let integral: f64 = density.iter().sum::<f64>() * step;
    assert!((integral - 1.0).abs() < 1e-3, "integral = {integral}");
    assert!(density.iter().all(|&d| d >= 0.0));
}

#[test]
fn test_scott_bandwidth_fallback() {
    assert_eq!(scott_bandwidth(&[1.5, 1.5, 1.5]), FALLBACK_BANDWIDTH);
    assert_eq!(scott_bandwidth(&[1.2]), FALLBACK_BANDWIDTH);
    let h = scott_bandwidth(&[1.0, 2.0]);
    let expected = std::f64::consts::FRAC_1_SQRT_2 * 2f64.powf(-0.2);
    assert!((h - expected).abs() < 1e-12);
}

#[test]
fn test_density_curves_follow_params() {
    let p = partition(&[0.8, 1.2], &[1.0, 1.4]);
    let with = run_stage4(&p, &Stage4Params::default());
    assert_eq!(with.densities.len(), 2);
    let curve = with.density(Cohort::Control).unwrap();
    assert_eq!(curve.points.len(), DENSITY_POINTS);
    assert_eq!(curve.points[0].0, 0.8);

    let without = run_stage4(
        &p,
        &Stage4Params {
            bins: 5,
            density: false,
        },
    );
    assert!(without.densities.is_empty());
    assert_eq!(without.histogram.parkinsons.len(), 5);
}
