pub mod stats;
pub mod transform;

pub use stats::StatsHelper;
pub use transform::{log_or_zero, log_or_zero_column};
