//! Human-readable text for order dashboards.
//!
//! Turns view records and statistics into deadline labels, an attention
//! list of urgent orders, and a one-line summary.

use serde::{Deserialize, Serialize};
use tailorboard_model::{Priority, Statistics, ViewRecord};

/// An order that needs attention soon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: String,
    pub display_id: String,

    /// Short summary (1 line)
    pub summary: String,

    /// Detail naming customer and status
    pub detail: String,

    pub days_remaining: i64,
}

/// Deadline label for a record, e.g. `Due in 3 days` or `Overdue by 1 day`.
pub fn deadline_label(record: &ViewRecord) -> String {
    if record.status_category.is_closed() {
        return record.status_category.label().to_string();
    }

    match record.days_remaining {
        d if d < 0 => format!("Overdue by {}", plural_days(d.unsigned_abs())),
        0 => "Due today".to_string(),
        1 => "Due tomorrow".to_string(),
        d => format!("Due in {}", plural_days(d.unsigned_abs())),
    }
}

fn plural_days(days: u64) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", days)
    }
}

/// Notices for open high-priority records, most overdue first.
pub fn attention(records: &[ViewRecord]) -> Vec<Notice> {
    let mut urgent: Vec<&ViewRecord> = records
        .iter()
        .filter(|r| !r.status_category.is_closed() && r.priority == Priority::High)
        .collect();
    urgent.sort_by_key(|r| r.days_remaining);

    urgent.into_iter().map(explain_record).collect()
}

/// Notice text for a single record.
pub fn explain_record(record: &ViewRecord) -> Notice {
    let summary = format!("{} {}", record.display_id, deadline_label(record).to_lowercase());
    let detail = format!(
        "Order {} for {} is {} ({}% complete).",
        record.display_id,
        record.customer_name,
        record.status_category.label().to_lowercase(),
        record.progress_percent
    );

    Notice {
        id: record.id.clone(),
        display_id: record.display_id.clone(),
        summary,
        detail,
        days_remaining: record.days_remaining,
    }
}

/// One-line dashboard summary of statistics.
pub fn summarize(stats: &Statistics) -> String {
    if stats.total_count == 0 {
        return "No orders found.".to_string();
    }

    let noun = if stats.total_count == 1 { "order" } else { "orders" };
    let mut summary = format!(
        "{} {}, {} active",
        stats.total_count, noun, stats.active_count
    );
    if stats.overdue_count > 0 {
        summary.push_str(&format!(", {} overdue", stats.overdue_count));
    }
    summary.push_str(&format!(". Total value {:.2}", stats.total_amount));
    summary
}
