use super::*;
use crate::model::{LoadStrategy, Record};

fn dataset(records: Vec<Record>) -> Dataset {
    Dataset {
        rows_read: records.len(),
        records,
        columns: vec!["Group".to_string(), "Speed_01".to_string()],
        rows_dropped: 0,
        lines_skipped: 0,
        strategy: LoadStrategy::Strict,
    }
}

#[test]
fn test_partition_keeps_input_order() {
    let ds = dataset(vec![
        Record { group: 2, speed: 1.4 },
        Record { group: 1, speed: 0.8 },
        Record { group: 2, speed: 1.0 },
        Record { group: 1, speed: 1.2 },
    ]);
    let p = run_stage2(&ds);
    assert_eq!(p.parkinsons, vec![0.8, 1.2]);
    assert_eq!(p.control, vec![1.4, 1.0]);
    assert_eq!(p.unrecognized_rows, 0);
}

#[test]
fn test_unrecognized_groups_are_excluded_and_counted() {
    let ds = dataset(vec![
        Record { group: 1, speed: 0.9 },
        Record { group: 3, speed: 1.1 },
        Record { group: 0, speed: 1.0 },
        Record { group: 3, speed: 1.2 },
        Record { group: 2, speed: 1.3 },
    ]);
    let p = run_stage2(&ds);
    assert_eq!(p.speeds(Cohort::Parkinsons), &[0.9]);
    assert_eq!(p.speeds(Cohort::Control), &[1.3]);
    assert_eq!(p.unrecognized_rows, 3);
    assert_eq!(p.unrecognized_values.iter().copied().collect::<Vec<_>>(), vec![0, 3]);
}
