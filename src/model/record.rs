use std::fmt;

use serde::Serialize;

/// `Group` value used for Parkinson's subjects in the PhysioNet gait
/// demographics table.
pub const PARKINSONS_GROUP: i64 = 1;
/// `Group` value used for healthy control subjects.
pub const CONTROL_GROUP: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cohort {
    Parkinsons,
    Control,
}

impl Cohort {
    pub const ALL: [Cohort; 2] = [Cohort::Parkinsons, Cohort::Control];

    pub fn from_group(group: i64) -> Option<Self> {
        match group {
            PARKINSONS_GROUP => Some(Cohort::Parkinsons),
            CONTROL_GROUP => Some(Cohort::Control),
            _ => None,
        }
    }

    pub fn group_value(self) -> i64 {
        match self {
            Cohort::Parkinsons => PARKINSONS_GROUP,
            Cohort::Control => CONTROL_GROUP,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Cohort::Parkinsons => "Parkinson's",
            Cohort::Control => "Control",
        }
    }
}

impl fmt::Display for Cohort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One subject row that survived parsing. `speed` is always finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    pub group: i64,
    pub speed: f64,
}

impl Record {
    pub fn cohort(&self) -> Option<Cohort> {
        Cohort::from_group(self.group)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStrategy {
    Strict,
    SkipBadLines,
    ManualRecovery,
}

impl LoadStrategy {
    pub fn name(self) -> &'static str {
        match self {
            LoadStrategy::Strict => "strict",
            LoadStrategy::SkipBadLines => "skip-bad-lines",
            LoadStrategy::ManualRecovery => "manual-recovery",
        }
    }
}

impl fmt::Display for LoadStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Vec<Record>,
    /// Header names as discovered in the source, trimmed.
    pub columns: Vec<String>,
    /// Non-blank data lines seen after the header.
    pub rows_read: usize,
    /// Rows whose group or speed field could not be parsed.
    pub rows_dropped: usize,
    /// Over-wide lines discarded by the skip-bad-lines strategy.
    pub lines_skipped: usize,
    pub strategy: LoadStrategy,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
