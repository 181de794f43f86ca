use std::fs::File;
use std::io::Write;

use crate::error::Result;
use crate::plan::EventPlan;
use crate::schedule::ScoredDate;
use crate::staffing::{total_headcount, StaffingRecommendation};

/// One line per date: "2026-04-01 (Wed) score 13  must-have 1/1  nice 1  backup 0"
pub fn format_date_line(scored: &ScoredDate) -> String {
    let marker = if scored.all_must_have_available { "✓" } else { " " };
    format!(
        "{} {} ({}) score {:>3}  must-have {}/{}  nice {}  backup {}",
        marker,
        scored.date.format("%Y-%m-%d"),
        scored.date.format("%a"),
        scored.score,
        scored.must_have_count,
        scored.must_have_total,
        scored.nice_to_have_count,
        scored.backup_count,
    )
}

/// Prints the top `limit` dates of a ranking
pub fn print_ranked_dates(scored: &[ScoredDate], limit: usize) {
    println!("\n=== Candidate Dates ===");
    if scored.is_empty() {
        println!("No days in the candidate range.");
        return;
    }

    let full = scored.iter().filter(|s| s.all_must_have_available).count();
    println!("Days evaluated: {}, with every must-have vendor: {}", scored.len(), full);
    println!();
    for s in scored.iter().take(limit) {
        println!("  {}", format_date_line(s));
    }
    if scored.len() > limit {
        println!("  ... {} more", scored.len() - limit);
    }
}

/// Writes the full ranking to a file, one date per line
pub fn write_ranked_dates_to_file(scored: &[ScoredDate], filename: &str) -> Result<()> {
    let mut file = File::create(filename)?;
    writeln!(file, "** Candidate dates, best first **")?;
    for s in scored {
        writeln!(file, "{}", format_date_line(s))?;
    }
    Ok(())
}

pub fn print_staffing(recommendations: &[StaffingRecommendation]) {
    println!("\n=== Recommended Staffing ===");
    for r in recommendations {
        println!("  {:<22} {:>3}  {}", r.role.display_name(), r.headcount, r.rationale);
    }
    println!("  {:<22} {:>3}", "Total", total_headcount(recommendations));
}

pub fn print_event_plan(plan: &EventPlan) {
    println!("\n=== Plan: {} ===", plan.event_title);
    println!(
        "Sections {}/{}, tasks {}/{}",
        plan.completed_sections, plan.total_sections, plan.completed_tasks, plan.total_tasks
    );
    for section in &plan.sections {
        println!("  {} ({}/{})", section.title, section.done_count, section.total_count);
        for task in &section.tasks {
            let mark = if task.done { "x" } else { " " };
            println!("    [{}] {}", mark, task.title);
        }
    }
}
