use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::MarchenError;

/// How essential a vendor's participation is to an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VendorPriority {
    MustHave,
    NiceToHave,
    Backup,
}

impl VendorPriority {
    pub const ALL: [VendorPriority; 3] = [
        VendorPriority::MustHave,
        VendorPriority::NiceToHave,
        VendorPriority::Backup,
    ];

    /// Points a single available vendor of this tier adds to a day's score
    pub fn weight(self) -> u32 {
        match self {
            VendorPriority::MustHave => 10,
            VendorPriority::NiceToHave => 3,
            VendorPriority::Backup => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VendorPriority::MustHave => "MUST_HAVE",
            VendorPriority::NiceToHave => "NICE_TO_HAVE",
            VendorPriority::Backup => "BACKUP",
        }
    }
}

impl fmt::Display for VendorPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VendorPriority {
    type Err = MarchenError;

    /// Accepts "MUST_HAVE", "must have", "Must-Have", "nicetohave", "backup", ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();

        match key.as_str() {
            "musthave" => Ok(VendorPriority::MustHave),
            "nicetohave" => Ok(VendorPriority::NiceToHave),
            "backup" => Ok(VendorPriority::Backup),
            _ => Err(MarchenError::UnknownPriority(s.trim().to_string())),
        }
    }
}

/// One vendor's availability for the event being planned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorAvailability {
    pub vendor_name: String,
    pub priority: VendorPriority,
    pub available_dates: Vec<NaiveDate>,
}

impl VendorAvailability {
    pub fn new(vendor_name: impl Into<String>, priority: VendorPriority, available_dates: Vec<NaiveDate>) -> Self {
        Self {
            vendor_name: vendor_name.into(),
            priority,
            available_dates,
        }
    }
}

/// Inclusive range of candidate days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl CandidateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Every day from start to end inclusive; nothing when start is after end
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }

    pub fn len(&self) -> usize {
        if self.start > self.end {
            0
        } else {
            (self.end - self.start).num_days() as usize + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

/// A candidate day with its availability breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredDate {
    pub date: NaiveDate,
    pub score: u32,
    pub must_have_count: u32,
    pub must_have_total: u32,
    pub nice_to_have_count: u32,
    pub backup_count: u32,
    pub all_must_have_available: bool,
}
