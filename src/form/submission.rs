use chrono::{FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MarchenError, Result};
use crate::schedule::date_utils::parse_day;
use crate::schedule::{VendorAvailability, VendorPriority};

/// Upper bound on dates in one submission, a year's worth of days
pub const MAX_DATES_PER_SUBMISSION: usize = 366;

/// Availability form as posted by a vendor
#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilitySubmissionRequest {
    pub vendor_name: String,
    pub priority: String,
    pub available_dates: Vec<String>,
}

/// A validated availability submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilitySubmission {
    /// RFC 3339 time the form was accepted
    pub timestamp: String,
    pub vendor_name: String,
    pub priority: VendorPriority,
    pub available_dates: Vec<NaiveDate>,
}

impl AvailabilitySubmission {
    pub fn into_availability(self) -> VendorAvailability {
        VendorAvailability::new(self.vendor_name, self.priority, self.available_dates)
    }
}

/// Validates an availability form and normalises its dates to days in `offset`
pub fn validate_submission(req: &AvailabilitySubmissionRequest, offset: FixedOffset) -> Result<AvailabilitySubmission> {
    let vendor_name = req.vendor_name.trim();
    if vendor_name.is_empty() {
        return Err(MarchenError::InvalidInput("Vendor name is required".to_string()));
    }

    let priority: VendorPriority = req.priority.parse()?;

    if req.available_dates.is_empty() {
        return Err(MarchenError::InvalidInput("At least one available date is required".to_string()));
    }
    if req.available_dates.len() > MAX_DATES_PER_SUBMISSION {
        return Err(MarchenError::InvalidInput(format!(
            "At most {} available dates can be submitted",
            MAX_DATES_PER_SUBMISSION
        )));
    }

    let mut available_dates = req
        .available_dates
        .iter()
        .map(|d| parse_day(d, offset))
        .collect::<Result<Vec<NaiveDate>>>()?;
    available_dates.sort();
    available_dates.dedup();

    Ok(AvailabilitySubmission {
        timestamp: Utc::now().to_rfc3339(),
        vendor_name: vendor_name.to_string(),
        priority,
        available_dates,
    })
}
