pub mod submission;
pub mod export;

pub use submission::{AvailabilitySubmission, AvailabilitySubmissionRequest, validate_submission};
pub use export::export_submission_to_csv;
