use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Capacity assumed for events that have none recorded
pub const DEFAULT_EVENT_VENDORS: u32 = 10;
/// Visitors expected per vendor when no estimate is given
pub const VISITORS_PER_VENDOR: u32 = 100;
pub const DEFAULT_DURATION_HOURS: f64 = 6.0;
/// Events longer than this get shift relief
pub const LONG_EVENT_HOURS: f64 = 8.0;
/// Venues larger than this need a parking crew
pub const PARKING_AREA_THRESHOLD_SQ_M: f64 = 1000.0;

/// Operational role that needs a headcount on event day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffingRole {
    Reception,
    Guidance,
    SetupTeardown,
    Headquarters,
    FirstAid,
    Parking,
}

impl StaffingRole {
    pub fn display_name(self) -> &'static str {
        match self {
            StaffingRole::Reception => "Reception",
            StaffingRole::Guidance => "Guidance & wayfinding",
            StaffingRole::SetupTeardown => "Setup & teardown",
            StaffingRole::Headquarters => "Headquarters",
            StaffingRole::FirstAid => "First aid",
            StaffingRole::Parking => "Parking",
        }
    }
}

impl fmt::Display for StaffingRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Scale of the event being staffed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaffingInput {
    pub max_vendors: u32,
    #[serde(default)]
    pub area_sq_m: Option<f64>,
    #[serde(default)]
    pub expected_visitors: Option<u32>,
    #[serde(default)]
    pub duration_hours: Option<f64>,
}

impl StaffingInput {
    pub fn new(max_vendors: u32) -> Self {
        Self {
            max_vendors,
            ..Self::default()
        }
    }

    /// Input for an event record, whose capacity may not be filled in yet
    pub fn for_event(max_vendors: Option<u32>) -> Self {
        Self::new(max_vendors.unwrap_or(DEFAULT_EVENT_VENDORS))
    }

    pub fn visitors(&self) -> u32 {
        self.expected_visitors
            .unwrap_or_else(|| self.max_vendors.saturating_mul(VISITORS_PER_VENDOR))
    }

    pub fn hours(&self) -> f64 {
        self.duration_hours.unwrap_or(DEFAULT_DURATION_HOURS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffingRecommendation {
    pub role: StaffingRole,
    pub headcount: u32,
    pub rationale: String,
}

/// Estimates headcount per role from the event's scale
///
/// Five baseline roles are always present; Parking is added for venues over
/// 1000 m². For events over 8 hours every headcount, Parking included, is
/// scaled by 1.5 and rounded up.
pub fn calculate_staffing(input: &StaffingInput) -> Vec<StaffingRecommendation> {
    let vendors = input.max_vendors;
    let visitors = input.visitors();
    let hours = input.hours();

    let reception = vendors.div_ceil(15).max(2);
    let guidance = visitors.div_ceil(200).max(2);
    let setup = vendors.div_ceil(5).max(4);
    let headquarters = vendors.div_ceil(20).max(2);
    let first_aid = if visitors > 500 { 2 } else { 1 };

    let mut recommendations = vec![
        StaffingRecommendation {
            role: StaffingRole::Reception,
            headcount: reception,
            rationale: format!("{} reception staff for {} vendors", reception, vendors),
        },
        StaffingRecommendation {
            role: StaffingRole::Guidance,
            headcount: guidance,
            rationale: format!("{} guides for an expected {} visitors", guidance, visitors),
        },
        StaffingRecommendation {
            role: StaffingRole::SetupTeardown,
            headcount: setup,
            rationale: format!("{} people to put up and take down tents for {} vendors", setup, vendors),
        },
        StaffingRecommendation {
            role: StaffingRole::Headquarters,
            headcount: headquarters,
            rationale: "Overall event management and emergency response".to_string(),
        },
        StaffingRecommendation {
            role: StaffingRole::FirstAid,
            headcount: first_aid,
            rationale: format!("First aid cover for around {} visitors", visitors),
        },
    ];

    // NaN and small areas never add parking
    if let Some(area) = input.area_sq_m.filter(|a| *a > PARKING_AREA_THRESHOLD_SQ_M) {
        let parking = (area / 2000.0).ceil().min(u32::MAX as f64) as u32;
        recommendations.push(StaffingRecommendation {
            role: StaffingRole::Parking,
            headcount: parking,
            rationale: format!("Parking management for a {} m² venue", area),
        });
    }

    if hours > LONG_EVENT_HOURS {
        recommendations = add_shift_relief(recommendations, hours);
    }

    debug!(vendors, visitors, hours, roles = recommendations.len(), "calculated staffing");

    recommendations
}

/// Scales every headcount by 1.5 (rounded up) and notes why in the rationale
fn add_shift_relief(recommendations: Vec<StaffingRecommendation>, hours: f64) -> Vec<StaffingRecommendation> {
    recommendations
        .into_iter()
        .map(|r| StaffingRecommendation {
            role: r.role,
            // ceil(n * 1.5) in u64, clamped so a huge headcount never shrinks
            headcount: (u64::from(r.headcount) * 3).div_ceil(2).min(u64::from(u32::MAX)) as u32,
            rationale: format!("{} (includes shift relief for a {}-hour event)", r.rationale, hours),
        })
        .collect()
}

/// Sum of all headcounts, saturating at `u32::MAX`
pub fn total_headcount(recommendations: &[StaffingRecommendation]) -> u32 {
    recommendations.iter().map(|r| r.headcount).fold(0, u32::saturating_add)
}
