//! Command line and environment configuration.

use std::path::PathBuf;

use chrono::{FixedOffset, NaiveDate};
use clap::{Args, Parser, Subcommand};

use crate::error::Result;
use crate::schedule::parse_utc_offset;

#[derive(Debug, Parser)]
#[command(name = "marchen", version, about = "Plan bread-market events: pick a date, estimate staff")]
pub struct Cli {
    /// Log filter, e.g. "info" or "marchen=debug,actix_web=info"
    #[arg(long, global = true, env = "MARCHEN_LOG", default_value = "info")]
    pub log_level: String,

    /// UTC offset whose calendar days timestamps are mapped to ("+09:00", "Z", "-5")
    #[arg(long, global = true, env = "MARCHEN_UTC_OFFSET", default_value = "Z", allow_hyphen_values = true)]
    pub utc_offset: String,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn offset(&self) -> Result<FixedOffset> {
        parse_utc_offset(&self.utc_offset)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Rank candidate dates by vendor availability
    Dates(DatesArgs),
    /// Recommend headcount per role
    Staffing(StaffingArgs),
    /// Show plan progress for an event
    Plan(PlanArgs),
    /// Assess rain risk for an event day from a saved forecast
    Weather(WeatherArgs),
    /// Run the JSON API
    Serve(ServeArgs),
}

#[derive(Debug, Args)]
pub struct DatesArgs {
    /// Availability CSV (vendor, priority, available_dates)
    #[arg(long, env = "MARCHEN_DATA", default_value = "data/availability.csv")]
    pub csv: PathBuf,
    /// First candidate day (YYYY-MM-DD)
    #[arg(long)]
    pub start: NaiveDate,
    /// Last candidate day, inclusive
    #[arg(long)]
    pub end: NaiveDate,
    /// How many dates to print
    #[arg(long, default_value_t = 10)]
    pub top: usize,
    /// Also write the full ranking to this file
    #[arg(long)]
    pub output: Option<String>,
}

#[derive(Debug, Args)]
pub struct StaffingArgs {
    #[arg(long)]
    pub vendors: u32,
    #[arg(long)]
    pub area: Option<f64>,
    #[arg(long)]
    pub visitors: Option<u32>,
    #[arg(long)]
    pub hours: Option<f64>,
}

#[derive(Debug, Args)]
pub struct PlanArgs {
    /// JSON file with "event" and "counts" objects
    #[arg(long)]
    pub input: PathBuf,
}

#[derive(Debug, Args)]
pub struct WeatherArgs {
    /// Saved 5-day forecast response (JSON)
    #[arg(long)]
    pub forecast: PathBuf,
    #[arg(long)]
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    #[arg(long, env = "MARCHEN_BIND", default_value = "0.0.0.0")]
    pub bind: String,
    #[arg(long, env = "MARCHEN_PORT", default_value_t = 8080)]
    pub port: u16,
    /// Availability CSV read at startup and appended to by submissions
    #[arg(long, env = "MARCHEN_DATA", default_value = "data/availability.csv")]
    pub data: PathBuf,
}
