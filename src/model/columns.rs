use std::path::{Path, PathBuf};

pub const DEFAULT_DELIMITER: char = '\t';
pub const DEFAULT_GROUP_COLUMN: &str = "Group";
pub const DEFAULT_SPEED_COLUMN: &str = "Speed_01";

/// Where the demographics table lives and which of its columns carry the
/// cohort label and the gait speed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub path: PathBuf,
    pub delimiter: char,
    pub group_column: String,
    pub speed_column: String,
}

impl ColumnSpec {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            delimiter: DEFAULT_DELIMITER,
            group_column: DEFAULT_GROUP_COLUMN.to_string(),
            speed_column: DEFAULT_SPEED_COLUMN.to_string(),
        }
    }

    pub fn with_columns(mut self, group_column: &str, speed_column: &str) -> Self {
        self.group_column = group_column.to_string();
        self.speed_column = speed_column.to_string();
        self
    }

    /// Positions of the group and speed columns in `header`. On failure returns
    /// the names that could not be found, in declaration order.
    pub fn locate(&self, header: &[String]) -> Result<(usize, usize), Vec<String>> {
        let group_idx = header.iter().position(|h| h == &self.group_column);
        let speed_idx = header.iter().position(|h| h == &self.speed_column);
        match (group_idx, speed_idx) {
            (Some(g), Some(s)) => Ok((g, s)),
            _ => {
                let mut missing = Vec::new();
                if group_idx.is_none() {
                    missing.push(self.group_column.clone());
                }
                if speed_idx.is_none() {
                    missing.push(self.speed_column.clone());
                }
                Err(missing)
            }
        }
    }
}
