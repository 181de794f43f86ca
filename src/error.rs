//! Error types for the input, form and server layers.
//!
//! The date optimizer and staffing estimator are total and never produce these.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MarchenError>;

#[derive(Error, Debug)]
pub enum MarchenError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Priority text that matches none of the three tiers
    #[error("Unknown vendor priority: {0}")]
    UnknownPriority(String),

    #[error("Invalid date '{input}': expected YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDate { input: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
