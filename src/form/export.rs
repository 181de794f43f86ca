use std::fs::OpenOptions;
use std::path::Path;

use csv::WriterBuilder;
use tracing::info;

use crate::error::Result;
use crate::form::submission::AvailabilitySubmission;

pub const CSV_HEADER: [&str; 4] = ["submitted_at", "vendor", "priority", "available_dates"];

/// Appends a submission to the availability CSV, in the format `load_availability` reads
///
/// The header row is written first when the file is new or empty.
pub fn export_submission_to_csv(submission: &AvailabilitySubmission, csv_path: &Path) -> Result<()> {
    let needs_header = std::fs::metadata(csv_path).map(|m| m.len() == 0).unwrap_or(true);

    let file = OpenOptions::new().create(true).append(true).open(csv_path)?;
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(file);

    if needs_header {
        wtr.write_record(CSV_HEADER)?;
    }

    let dates = submission
        .available_dates
        .iter()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect::<Vec<_>>()
        .join(", ");

    wtr.write_record([
        submission.timestamp.as_str(),
        submission.vendor_name.as_str(),
        submission.priority.as_str(),
        dates.as_str(),
    ])?;
    wtr.flush()?;

    info!(vendor = %submission.vendor_name, path = %csv_path.display(), "recorded availability submission");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::load_availability;
    use crate::schedule::{utc, VendorPriority};
    use chrono::NaiveDate;

    fn submission(name: &str, priority: VendorPriority, days: &[u32]) -> AvailabilitySubmission {
        AvailabilitySubmission {
            timestamp: "2026-03-01T10:00:00+00:00".to_string(),
            vendor_name: name.to_string(),
            priority,
            available_dates: days
                .iter()
                .map(|d| NaiveDate::from_ymd_opt(2026, 4, *d).unwrap())
                .collect(),
        }
    }

    #[test]
    fn appended_rows_load_back_with_resubmissions_merged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("availability.csv");

        export_submission_to_csv(&submission("Le Fournil", VendorPriority::MustHave, &[1, 2]), &path).unwrap();
        export_submission_to_csv(&submission("Miche", VendorPriority::Backup, &[3]), &path).unwrap();
        export_submission_to_csv(&submission("Le Fournil", VendorPriority::MustHave, &[5]), &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().next(), Some("submitted_at,vendor,priority,available_dates"));
        assert_eq!(contents.lines().count(), 4);

        let entries = load_availability(&path, utc()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].vendor_name, "Le Fournil");
        assert_eq!(entries[0].available_dates, vec![NaiveDate::from_ymd_opt(2026, 4, 5).unwrap()]);
        assert_eq!(entries[1].priority, VendorPriority::Backup);
    }
}
