//! Client-side query engine over view records.
//!
//! Runs one query as a fixed sequence of stages:
//! - Search text (any of display id, customer name, email, tags)
//! - Status filter, then priority filter
//! - Stable sort on the requested key
//! - Page windowing

use std::cmp::Ordering;

use tailorboard_model::{QueryParams, QueryResult, SortBy, SortOrder, ViewRecord, DEFAULT_PAGE_SIZE};

/// Run a query. Never fails; malformed paging is coerced.
pub fn query(records: &[ViewRecord], params: &QueryParams) -> QueryResult {
    let needle = params.search_text.to_lowercase();

    let mut matched: Vec<&ViewRecord> = records
        .iter()
        .filter(|r| matches_search(r, &needle))
        .filter(|r| params.status_filter.map_or(true, |s| r.status_category == s))
        .filter(|r| params.priority_filter.map_or(true, |p| r.priority == p))
        .collect();

    sort_records(&mut matched, params.sort_by, params.sort_order);

    let page = params.page.max(1);
    let page_size = if params.page_size == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        params.page_size
    };

    let total_count = matched.len();
    let total_pages = total_count.div_ceil(page_size);
    let start = (page - 1).saturating_mul(page_size).min(total_count);
    let end = start.saturating_add(page_size).min(total_count);

    tracing::debug!(
        input = records.len(),
        matched = total_count,
        page,
        page_size,
        "query evaluated"
    );

    QueryResult {
        items: matched[start..end].iter().map(|r| (*r).clone()).collect(),
        total_count,
        total_pages,
        page,
        page_size,
    }
}

/// Whether any searchable field contains `needle`. `needle` must be lower-case.
pub fn matches_search(record: &ViewRecord, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }

    let contains = |field: &str| field.to_lowercase().contains(needle);

    contains(&record.display_id)
        || contains(&record.customer_name)
        || contains(&record.customer_email)
        || record.tags.iter().any(|t| contains(t.as_str()))
}

/// Stable sort; equal keys keep their input order in both directions.
pub fn sort_records(records: &mut [&ViewRecord], sort_by: SortBy, sort_order: SortOrder) {
    records.sort_by(|a, b| {
        let ordering = compare(a, b, sort_by);
        match sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

/// Ascending comparison on a single key.
pub fn compare(a: &ViewRecord, b: &ViewRecord, sort_by: SortBy) -> Ordering {
    match sort_by {
        SortBy::CreatedAt => a.created_at.cmp(&b.created_at),
        SortBy::Amount => a.amount.total_cmp(&b.amount),
        SortBy::Status => a.status_category.cmp(&b.status_category),
        SortBy::CustomerName => a
            .customer_name
            .to_lowercase()
            .cmp(&b.customer_name.to_lowercase()),
        SortBy::Deadline => a.deadline.cmp(&b.deadline),
    }
}
