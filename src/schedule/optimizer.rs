use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::debug;

use super::types::{CandidateRange, ScoredDate, VendorAvailability, VendorPriority};

/// Vendors of a single priority tier with their days as sets for fast lookup
struct TierGroup {
    priority: VendorPriority,
    vendors: Vec<HashSet<NaiveDate>>,
}

impl TierGroup {
    fn collect(vendors: &[VendorAvailability], priority: VendorPriority) -> Self {
        let vendors = vendors
            .iter()
            .filter(|v| v.priority == priority)
            .map(|v| v.available_dates.iter().copied().collect())
            .collect();
        Self { priority, vendors }
    }

    fn available_on(&self, day: NaiveDate) -> u32 {
        self.vendors.iter().filter(|days| days.contains(&day)).count() as u32
    }

    fn total(&self) -> u32 {
        self.vendors.len() as u32
    }
}

/// Scores one day against the three tier groups
fn score_day(day: NaiveDate, must_have: &TierGroup, nice_to_have: &TierGroup, backup: &TierGroup) -> ScoredDate {
    let must_have_count = must_have.available_on(day);
    let nice_to_have_count = nice_to_have.available_on(day);
    let backup_count = backup.available_on(day);

    let score = must_have_count * must_have.priority.weight()
        + nice_to_have_count * nice_to_have.priority.weight()
        + backup_count * backup.priority.weight();

    ScoredDate {
        date: day,
        score,
        must_have_count,
        must_have_total: must_have.total(),
        nice_to_have_count,
        backup_count,
        // Vacuously true when the event has no must-have vendors
        all_must_have_available: must_have_count == must_have.total(),
    }
}

/// Ranks every day in `range` by vendor availability
///
/// Days where all must-have vendors are available come first, then the rest;
/// within each group days are ordered by score descending. The sort is stable,
/// so equal days keep chronological order. An inverted range yields no days.
pub fn find_optimal_dates(vendors: &[VendorAvailability], range: &CandidateRange) -> Vec<ScoredDate> {
    let must_have = TierGroup::collect(vendors, VendorPriority::MustHave);
    let nice_to_have = TierGroup::collect(vendors, VendorPriority::NiceToHave);
    let backup = TierGroup::collect(vendors, VendorPriority::Backup);

    let mut scored: Vec<ScoredDate> = range
        .days()
        .map(|day| score_day(day, &must_have, &nice_to_have, &backup))
        .collect();

    scored.sort_by(|a, b| {
        b.all_must_have_available
            .cmp(&a.all_must_have_available)
            .then_with(|| b.score.cmp(&a.score))
    });

    debug!(
        vendors = vendors.len(),
        must_have = must_have.total(),
        days = scored.len(),
        "ranked candidate dates"
    );

    scored
}

/// The top-ranked day, if the range contains any
pub fn best_date(vendors: &[VendorAvailability], range: &CandidateRange) -> Option<ScoredDate> {
    find_optimal_dates(vendors, range).into_iter().next()
}
