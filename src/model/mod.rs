pub mod columns;
pub mod record;

pub use columns::ColumnSpec;
pub use record::{Cohort, Dataset, LoadStrategy, Record};
