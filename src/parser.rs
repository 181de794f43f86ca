use std::collections::{BTreeSet, HashMap};
use std::io::Read;
use std::path::Path;

use chrono::{FixedOffset, NaiveDate};
use csv::{Reader, StringRecord};
use tracing::{info, warn};

use crate::error::{MarchenError, Result};
use crate::schedule::date_utils::{parse_day, split_date_list};
use crate::schedule::{VendorAvailability, VendorPriority};

/// Column positions found from the header row
struct Columns {
    vendor: usize,
    priority: usize,
    dates: usize,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Self {
        let find = |pred: &dyn Fn(&str) -> bool| {
            headers.iter().position(|h| pred(h.to_lowercase().as_str()))
        };
        Self {
            vendor: find(&|h| h.contains("vendor") || h.contains("bakery")).unwrap_or(0),
            priority: find(&|h| h.contains("priority")).unwrap_or(1),
            dates: find(&|h| h.contains("date") || h.contains("available")).unwrap_or(2),
        }
    }
}

/// Parses a cell of dates, dropping duplicates and anything unparseable
fn parse_available_dates(cell: &str, offset: FixedOffset, vendor: &str) -> Vec<NaiveDate> {
    let mut days = BTreeSet::new();
    for part in split_date_list(cell) {
        match parse_day(part, offset) {
            Ok(day) => {
                days.insert(day);
            }
            Err(e) => warn!(vendor, "skipping date: {}", e),
        }
    }
    days.into_iter().collect()
}

/// Reads vendor availability from CSV data with a header row
///
/// A vendor listed again replaces its earlier row (a resubmission), keeping the
/// position it was first seen at. Rows without a vendor name are skipped.
pub fn read_availability<R: Read>(source: R, offset: FixedOffset) -> Result<Vec<VendorAvailability>> {
    let mut reader = Reader::from_reader(source);
    let columns = Columns::locate(reader.headers()?);

    let mut entries: Vec<VendorAvailability> = Vec::new();
    // lowercased vendor name -> index into entries
    let mut seen: HashMap<String, usize> = HashMap::new();

    for (row, result) in reader.records().enumerate() {
        let record = result?;

        let vendor_name = record.get(columns.vendor).unwrap_or("").trim().to_string();
        if vendor_name.is_empty() {
            continue;
        }

        let priority_text = record.get(columns.priority).unwrap_or("");
        let priority: VendorPriority = priority_text.parse().map_err(|_| {
            MarchenError::InvalidInput(format!(
                "row {}: unknown priority '{}' for {}",
                row + 2,
                priority_text.trim(),
                vendor_name
            ))
        })?;

        let available_dates =
            parse_available_dates(record.get(columns.dates).unwrap_or(""), offset, &vendor_name);

        let entry = VendorAvailability::new(vendor_name, priority, available_dates);
        let key = entry.vendor_name.to_lowercase();

        match seen.get(&key) {
            Some(&index) => entries[index] = entry,
            None => {
                seen.insert(key, entries.len());
                entries.push(entry);
            }
        }
    }

    Ok(entries)
}

/// Loads vendor availability from a CSV file
pub fn load_availability<P: AsRef<Path>>(csv_path: P, offset: FixedOffset) -> Result<Vec<VendorAvailability>> {
    let path = csv_path.as_ref();
    let file = std::fs::File::open(path)?;
    let entries = read_availability(file, offset)?;
    info!(path = %path.display(), vendors = entries.len(), "loaded vendor availability");
    Ok(entries)
}
