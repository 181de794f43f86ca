//! Post-event reports.
//!
//! Both reports are rendered as markdown from records the caller loads from its
//! own storage: budget lines, equipment costs and sales for the accounting
//! report; accepted vendors, volunteers, sales and public feedback for the
//! activity report.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Event header shared by both reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEvent {
    pub title: String,
    pub event_date: NaiveDate,
    pub organizer: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetLine {
    pub category: String,
    pub planned_yen: i64,
    /// Not yet settled when absent; counts as zero
    #[serde(default)]
    pub actual_yen: Option<i64>,
}

impl BudgetLine {
    pub fn actual(&self) -> i64 {
        self.actual_yen.unwrap_or(0)
    }

    /// Actual minus planned; negative when under budget
    pub fn difference(&self) -> i64 {
        self.actual().saturating_sub(self.planned_yen)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentCost {
    pub item_name: String,
    pub quantity: u32,
    #[serde(default)]
    pub cost_yen: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub vendor_name: String,
    pub amount_yen: i64,
    #[serde(default)]
    pub payment_method: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedVendor {
    pub shop_name: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// Feedback the organizer has made public
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicFeedback {
    pub content: String,
    #[serde(default)]
    pub author_name: Option<String>,
    /// 1 to 5; absent or zero means unrated
    #[serde(default)]
    pub rating: Option<u8>,
}

impl PublicFeedback {
    fn rated(&self) -> Option<u8> {
        self.rating.filter(|r| *r > 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountingTotals {
    pub budget_planned: i64,
    pub budget_actual: i64,
    pub budget_difference: i64,
    pub equipment_cost: i64,
    pub sales: i64,
    /// Actual budget spend plus equipment cost
    pub total_spend: i64,
    /// Sales minus total spend
    pub balance: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountingReport {
    pub totals: AccountingTotals,
    pub markdown: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityReport {
    pub vendor_count: u32,
    pub volunteer_count: u32,
    pub total_sales: i64,
    pub average_rating: Option<f64>,
    pub markdown: String,
}

const FOOTER: &str = "---\n*This report was generated automatically by Marchen.*\n";

fn sum(values: impl Iterator<Item = i64>) -> i64 {
    values.fold(0, i64::saturating_add)
}

pub fn total_sales(sales: &[SaleRecord]) -> i64 {
    sum(sales.iter().map(|s| s.amount_yen))
}

pub fn accounting_totals(budgets: &[BudgetLine], equipment: &[EquipmentCost], sales: &[SaleRecord]) -> AccountingTotals {
    let budget_planned = sum(budgets.iter().map(|b| b.planned_yen));
    let budget_actual = sum(budgets.iter().map(BudgetLine::actual));
    let equipment_cost = sum(equipment.iter().map(|e| e.cost_yen.unwrap_or(0)));
    let sales = total_sales(sales);
    let total_spend = budget_actual.saturating_add(equipment_cost);

    AccountingTotals {
        budget_planned,
        budget_actual,
        budget_difference: budget_actual.saturating_sub(budget_planned),
        equipment_cost,
        sales,
        total_spend,
        balance: sales.saturating_sub(total_spend),
    }
}

/// Mean rating over rated feedback, `None` when nothing is rated
pub fn average_rating(feedback: &[PublicFeedback]) -> Option<f64> {
    let ratings: Vec<u8> = feedback.iter().filter_map(PublicFeedback::rated).collect();
    if ratings.is_empty() {
        return None;
    }
    let total: u32 = ratings.iter().map(|r| u32::from(*r)).sum();
    Some(f64::from(total) / ratings.len() as f64)
}

/// "¥1,234,567"; negatives keep the sign after the symbol ("¥-5,000")
pub fn format_yen(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if amount < 0 { "-" } else { "" };
    format!("¥{}{}", sign, grouped)
}

fn day(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn accounting_report(
    event: &ReportEvent,
    budgets: &[BudgetLine],
    equipment: &[EquipmentCost],
    sales: &[SaleRecord],
    report_date: NaiveDate,
) -> AccountingReport {
    let totals = accounting_totals(budgets, equipment, sales);
    let mut md = String::new();

    md.push_str(&format!("# Accounting report: {}\n\n", event.title));
    md.push_str("## Overview\n");
    md.push_str(&format!("- **Event**: {}\n", event.title));
    md.push_str(&format!("- **Date**: {}\n", day(event.event_date)));
    md.push_str(&format!("- **Organizer**: {}\n", event.organizer));
    md.push_str(&format!("- **Report date**: {}\n\n", day(report_date)));

    md.push_str("## Budget\n");
    md.push_str("| Category | Planned | Actual | Difference |\n");
    md.push_str("|---|---|---|---|\n");
    for b in budgets {
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            b.category,
            format_yen(b.planned_yen),
            format_yen(b.actual()),
            format_yen(b.difference())
        ));
    }
    md.push_str(&format!(
        "| **Total** | **{}** | **{}** | **{}** |\n\n",
        format_yen(totals.budget_planned),
        format_yen(totals.budget_actual),
        format_yen(totals.budget_difference)
    ));

    md.push_str("## Equipment\n");
    md.push_str("| Item | Quantity | Cost |\n");
    md.push_str("|---|---|---|\n");
    for e in equipment {
        md.push_str(&format!(
            "| {} | {} | {} |\n",
            e.item_name,
            e.quantity,
            format_yen(e.cost_yen.unwrap_or(0))
        ));
    }
    md.push_str(&format!("| **Total** | | **{}** |\n\n", format_yen(totals.equipment_cost)));

    md.push_str("## Sales\n");
    md.push_str("| Vendor | Amount | Payment |\n");
    md.push_str("|---|---|---|\n");
    for s in sales {
        md.push_str(&format!(
            "| {} | {} | {} |\n",
            s.vendor_name,
            format_yen(s.amount_yen),
            s.payment_method.as_deref().unwrap_or("cash")
        ));
    }
    md.push_str(&format!("| **Total** | **{}** | |\n\n", format_yen(totals.sales)));

    md.push_str("## Summary\n");
    md.push_str(&format!("- **Total spend**: {}\n", format_yen(totals.total_spend)));
    md.push_str(&format!("- **Total sales**: {}\n", format_yen(totals.sales)));
    md.push_str(&format!("- **Balance**: {}\n\n", format_yen(totals.balance)));
    md.push_str(FOOTER);

    debug!(title = %event.title, balance = totals.balance, "rendered accounting report");

    AccountingReport { totals, markdown: md }
}

pub fn activity_report(
    event: &ReportEvent,
    vendors: &[AcceptedVendor],
    confirmed_volunteers: u32,
    sales: &[SaleRecord],
    feedback: &[PublicFeedback],
    report_date: NaiveDate,
) -> ActivityReport {
    let total_sales = total_sales(sales);
    let average_rating = average_rating(feedback);
    let rating_text = average_rating
        .map(|r| format!("{:.1}", r))
        .unwrap_or_else(|| "N/A".to_string());
    let mut md = String::new();

    md.push_str(&format!("# Activity report: {}\n\n", event.title));
    md.push_str("## Overview\n");
    md.push_str(&format!("- **Event**: {}\n", event.title));
    md.push_str(&format!("- **Date**: {}\n", day(event.event_date)));
    md.push_str(&format!(
        "- **Location**: {}\n",
        event.location.as_deref().unwrap_or("not specified")
    ));
    md.push_str(&format!("- **Organizer**: {}\n\n", event.organizer));

    md.push_str("## About the event\n");
    md.push_str(event.description.as_deref().unwrap_or("(no description)"));
    md.push_str("\n\n");

    md.push_str("## Results\n");
    md.push_str(&format!("- **Vendors**: {} shops\n", vendors.len()));
    md.push_str(&format!("- **Volunteers**: {} people\n", confirmed_volunteers));
    md.push_str(&format!("- **Total sales**: {}\n", format_yen(total_sales)));
    md.push_str(&format!("- **Average rating**: {} / 5.0\n\n", rating_text));

    md.push_str("## Vendors\n");
    for (i, v) in vendors.iter().enumerate() {
        match &v.category {
            Some(category) => md.push_str(&format!("{}. {} ({})\n", i + 1, v.shop_name, category)),
            None => md.push_str(&format!("{}. {}\n", i + 1, v.shop_name)),
        }
    }
    md.push('\n');

    md.push_str("## Visitor comments\n");
    if feedback.is_empty() {
        md.push_str("(no comments)\n");
    } else {
        let quotes: Vec<String> = feedback
            .iter()
            .map(|f| {
                let author = f.author_name.as_deref().unwrap_or("anonymous");
                match f.rated() {
                    Some(r) => format!("> {}\n> by {} ({}/5)", f.content, author, r),
                    None => format!("> {}\n> by {}", f.content, author),
                }
            })
            .collect();
        md.push_str(&quotes.join("\n\n"));
        md.push('\n');
    }
    md.push('\n');

    md.push_str("## Improvements\n");
    md.push_str("(to be filled in by the organizer)\n\n");
    md.push_str(FOOTER);
    md.push_str(&format!("*Report date: {}*\n", day(report_date)));

    debug!(title = %event.title, vendors = vendors.len(), "rendered activity report");

    ActivityReport {
        vendor_count: vendors.len() as u32,
        volunteer_count: confirmed_volunteers,
        total_sales,
        average_rating,
        markdown: md,
    }
}
