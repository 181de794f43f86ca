pub mod types;
pub mod date_utils;
pub mod optimizer;

pub use types::{CandidateRange, ScoredDate, VendorAvailability, VendorPriority};
pub use date_utils::{parse_day, parse_utc_offset, utc};
pub use optimizer::{best_date, find_optimal_dates};
