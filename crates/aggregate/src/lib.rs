//! Summary statistics for order dashboards.
//!
//! Folds a record set into counts and totals in one pass, without
//! touching the input.

use tailorboard_model::{Statistics, ViewRecord};

/// Aggregate records into dashboard statistics.
pub fn aggregate(records: &[ViewRecord]) -> Statistics {
    let stats = records.iter().fold(Statistics::default(), |mut stats, record| {
        accumulate(&mut stats, record);
        stats
    });

    tracing::debug!(
        total = stats.total_count,
        active = stats.active_count,
        overdue = stats.overdue_count,
        "aggregated records"
    );

    stats
}

/// Add one record to running statistics.
pub fn accumulate(stats: &mut Statistics, record: &ViewRecord) {
    *stats.count_by_status.entry(record.status_category).or_insert(0) += 1;
    *stats.count_by_priority.entry(record.priority).or_insert(0) += 1;
    stats.total_amount += record.amount;
    stats.total_count += 1;

    if !record.status_category.is_closed() {
        stats.active_count += 1;
        if record.days_remaining < 0 {
            stats.overdue_count += 1;
        }
    }
}
