//! Planning tools for bread-market events.
//!
//! [`schedule::find_optimal_dates`] ranks candidate days by how many vendors of
//! each priority tier can attend, and [`staffing::calculate_staffing`] turns an
//! event's scale into headcount per role. The rest is input, output and a small
//! JSON API around them.

pub mod config;
pub mod display;
pub mod error;
pub mod form;
pub mod logging;
pub mod parser;
pub mod plan;
pub mod report;
pub mod schedule;
pub mod staffing;
pub mod weather;
pub mod web;

pub use error::{MarchenError, Result};
