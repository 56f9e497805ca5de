//! Normalization of raw backend documents into view records.
//!
//! Provides pure functions deriving each display field:
//! - Status category and lifecycle progress
//! - Deadline, days remaining and priority
//! - Customer and tailor display names
//! - Display id, amount and tags
//!
//! Every function is total. Missing or malformed input falls back to a
//! fixed default, and the only clock is the `now` passed in.

use chrono::{DateTime, Duration, Utc};
use tailorboard_model::{Party, PartyRef, Priority, RawRecord, StatusCategory, ViewRecord};

pub const UNKNOWN_CUSTOMER: &str = "Unknown Customer";
pub const UNASSIGNED_TAILOR: &str = "Unassigned";
pub const DEFAULT_PAYMENT_STATUS: &str = "pending";

const DISPLAY_ID_LEN: usize = 8;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Thresholds used by the derivations.
#[derive(Debug, Clone)]
pub struct NormalizeConfig {
    /// Deadline offset from `now` when a record carries no date
    pub fallback_lead_days: i64,
    /// `days_remaining` at or below this is high priority
    pub high_within_days: i64,
    /// `days_remaining` at or below this (and above high) is medium priority
    pub medium_within_days: i64,
    /// Progress reported for in-progress records without hour tracking
    pub in_progress_percent: u8,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            fallback_lead_days: 7,
            high_within_days: 2,
            medium_within_days: 5,
            in_progress_percent: 50,
        }
    }
}

/// Normalize one record with the default configuration.
pub fn normalize(raw: &RawRecord, now: DateTime<Utc>) -> ViewRecord {
    normalize_with(raw, now, &NormalizeConfig::default())
}

/// Normalize one record.
pub fn normalize_with(raw: &RawRecord, now: DateTime<Utc>, config: &NormalizeConfig) -> ViewRecord {
    let id = raw.effective_id().unwrap_or_default().to_string();
    let status_raw = raw.status.clone().unwrap_or_default();
    let status_category = StatusCategory::from(status_raw.as_str());

    let deadline = resolve_deadline(raw, now, config);
    let days_remaining = days_remaining(deadline, now);
    let priority = resolve_priority(raw.priority.as_deref(), days_remaining, config);
    let progress_percent =
        resolve_progress(status_category, raw.estimated_hours, raw.completed_hours, config);

    let (customer_name, customer_email) = match raw.customer.as_ref() {
        Some(PartyRef::Embedded(party)) => (
            party_name(party).unwrap_or_else(|| UNKNOWN_CUSTOMER.to_string()),
            party.email.as_deref().unwrap_or_default().trim().to_string(),
        ),
        _ => (UNKNOWN_CUSTOMER.to_string(), String::new()),
    };

    let tailor_name = match raw.tailor.as_ref() {
        Some(PartyRef::Embedded(party)) => party_name(party),
        _ => None,
    }
    .unwrap_or_else(|| UNASSIGNED_TAILOR.to_string());

    if raw.effective_id().is_none() {
        tracing::trace!("record without id");
    }

    ViewRecord {
        display_id: display_id(&id),
        id,
        customer_name,
        customer_email,
        tailor_name,
        status_raw,
        status_category,
        priority,
        amount: parse_amount(raw.total_amount().or(raw.price)),
        payment_status: payment_status(raw.payment_status()),
        created_at: raw.created_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        deadline,
        days_remaining,
        progress_percent,
        tags: collect_tags(raw),
    }
}

/// Normalize a batch, preserving input order.
pub fn normalize_all(raws: &[RawRecord], now: DateTime<Utc>, config: &NormalizeConfig) -> Vec<ViewRecord> {
    let records: Vec<ViewRecord> = raws.iter().map(|raw| normalize_with(raw, now, config)).collect();
    tracing::debug!(count = records.len(), "normalized records");
    records
}

/// Delivery date, then estimated delivery, then `now + fallback_lead_days`.
pub fn resolve_deadline(raw: &RawRecord, now: DateTime<Utc>, config: &NormalizeConfig) -> DateTime<Utc> {
    raw.delivery_date()
        .or_else(|| raw.estimated_delivery())
        .unwrap_or_else(|| {
            tracing::trace!(id = raw.effective_id().unwrap_or_default(), "no deadline, using fallback");
            fallback_deadline(now, config.fallback_lead_days)
        })
}

/// `now + lead_days`, saturating at the representable range.
pub fn fallback_deadline(now: DateTime<Utc>, lead_days: i64) -> DateTime<Utc> {
    Duration::try_days(lead_days)
        .and_then(|lead| now.checked_add_signed(lead))
        .unwrap_or(if lead_days < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
}

/// Whole days until `deadline`, rounding partial days up.
pub fn days_remaining(deadline: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = deadline.signed_duration_since(now).num_milliseconds();
    (millis as f64 / MILLIS_PER_DAY).ceil() as i64
}

/// Priority from the time left before the deadline.
pub fn derive_priority(days_remaining: i64, config: &NormalizeConfig) -> Priority {
    if days_remaining <= config.high_within_days {
        Priority::High
    } else if days_remaining <= config.medium_within_days {
        Priority::Medium
    } else {
        Priority::Low
    }
}

/// Explicit priority if valid, otherwise derived from `days_remaining`.
pub fn resolve_priority(explicit: Option<&str>, days_remaining: i64, config: &NormalizeConfig) -> Priority {
    explicit
        .and_then(|p| p.parse::<Priority>().ok())
        .unwrap_or_else(|| derive_priority(days_remaining, config))
}

/// Hours ratio if tracked, otherwise a fixed value per status.
pub fn resolve_progress(
    status: StatusCategory,
    estimated_hours: Option<f64>,
    completed_hours: Option<f64>,
    config: &NormalizeConfig,
) -> u8 {
    match (estimated_hours, completed_hours) {
        (Some(estimated), Some(completed)) if estimated > 0.0 => {
            (completed / estimated * 100.0).round().clamp(0.0, 100.0) as u8
        }
        _ => status_progress(status, config),
    }
}

fn status_progress(status: StatusCategory, config: &NormalizeConfig) -> u8 {
    match status {
        StatusCategory::Completed | StatusCategory::Delivered => 100,
        StatusCategory::InProgress => config.in_progress_percent.min(100),
        _ => 0,
    }
}

/// Full name, else email local part. `None` when neither is usable.
pub fn party_name(party: &Party) -> Option<String> {
    let full = format!(
        "{} {}",
        party.first().unwrap_or_default().trim(),
        party.last().unwrap_or_default().trim()
    );
    let full = full.trim();
    if !full.is_empty() {
        return Some(full.to_string());
    }

    party
        .email
        .as_deref()
        .map(|email| email.trim().split('@').next().unwrap_or_default())
        .filter(|local| !local.is_empty())
        .map(str::to_string)
}

/// `#` followed by the last eight characters of `id`, upper-cased.
pub fn display_id(id: &str) -> String {
    let chars: Vec<char> = id.chars().collect();
    let start = chars.len().saturating_sub(DISPLAY_ID_LEN);
    let tail: String = chars[start..].iter().collect();
    format!("#{}", tail.to_uppercase())
}

/// Non-negative finite amount, 0 otherwise.
pub fn parse_amount(amount: Option<f64>) -> f64 {
    amount.filter(|a| a.is_finite() && *a > 0.0).unwrap_or(0.0)
}

fn payment_status(status: Option<&str>) -> String {
    status
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_PAYMENT_STATUS.to_string())
}

/// Garment type, then type discriminators, skipping blanks and repeats.
pub fn collect_tags(raw: &RawRecord) -> Vec<String> {
    let candidates = [
        raw.garment_type(),
        raw.booking_type.as_deref(),
        raw.kind.as_deref(),
        raw.category.as_deref(),
    ];

    let mut tags: Vec<String> = Vec::new();
    for tag in candidates.into_iter().flatten().map(str::trim) {
        if tag.is_empty() || tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            continue;
        }
        tags.push(tag.to_string());
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn due_in(days: i64) -> RawRecord {
        RawRecord::from_value(json!({
            "id": "order-1",
            "orderDetails": { "deliveryDate": (now() + Duration::days(days)).to_rfc3339() }
        }))
    }

    #[test]
    fn test_priority_from_deadline() {
        assert_eq!(normalize(&due_in(1), now()).priority, Priority::High);
        assert_eq!(normalize(&due_in(4), now()).priority, Priority::Medium);
        assert_eq!(normalize(&due_in(10), now()).priority, Priority::Low);

        let overdue = normalize(&due_in(-3), now());
        assert_eq!(overdue.days_remaining, -3);
        assert_eq!(overdue.priority, Priority::High);
    }

    #[test]
    fn test_priority_thresholds() {
        let config = NormalizeConfig::default();
        assert_eq!(derive_priority(2, &config), Priority::High);
        assert_eq!(derive_priority(3, &config), Priority::Medium);
        assert_eq!(derive_priority(5, &config), Priority::Medium);
        assert_eq!(derive_priority(6, &config), Priority::Low);
    }

    #[test]
    fn test_explicit_priority_wins_when_valid() {
        let config = NormalizeConfig::default();
        assert_eq!(resolve_priority(Some("Low"), 0, &config), Priority::Low);
        assert_eq!(resolve_priority(Some("urgent"), 0, &config), Priority::High);
        assert_eq!(resolve_priority(None, 30, &config), Priority::Low);
    }

    #[test]
    fn test_days_remaining_rounds_up() {
        let n = now();
        assert_eq!(days_remaining(n, n), 0);
        assert_eq!(days_remaining(n + Duration::hours(1), n), 1);
        assert_eq!(days_remaining(n + Duration::hours(36), n), 2);
        assert_eq!(days_remaining(n - Duration::hours(12), n), 0);
        assert_eq!(days_remaining(n - Duration::hours(36), n), -1);
    }

    #[test]
    fn test_deadline_fallbacks() {
        let config = NormalizeConfig::default();
        let estimated = RawRecord::from_value(json!({
            "timeline": { "estimatedDelivery": "2024-06-04T12:00:00Z" }
        }));
        assert_eq!(resolve_deadline(&estimated, now(), &config).to_rfc3339(), "2024-06-04T12:00:00+00:00");

        let both = RawRecord::from_value(json!({
            "orderDetails": { "deliveryDate": "2024-06-02T12:00:00Z" },
            "timeline": { "estimatedDelivery": "2024-06-04T12:00:00Z" }
        }));
        assert_eq!(days_remaining(resolve_deadline(&both, now(), &config), now()), 1);

        let neither = RawRecord::from_value(json!({
            "orderDetails": { "deliveryDate": "soon" }
        }));
        let view = normalize(&neither, now());
        assert_eq!(view.deadline, now() + Duration::days(7));
        assert_eq!(view.days_remaining, 7);
        assert_eq!(view.priority, Priority::Low);
    }

    #[test]
    fn test_progress_rules() {
        let config = NormalizeConfig::default();
        assert_eq!(resolve_progress(StatusCategory::Completed, None, None, &config), 100);
        assert_eq!(resolve_progress(StatusCategory::Delivered, None, None, &config), 100);
        assert_eq!(resolve_progress(StatusCategory::InProgress, None, None, &config), 50);
        assert_eq!(resolve_progress(StatusCategory::Pending, None, None, &config), 0);
        assert_eq!(resolve_progress(StatusCategory::Pending, Some(8.0), Some(2.0), &config), 25);
        assert_eq!(resolve_progress(StatusCategory::InProgress, Some(0.0), Some(2.0), &config), 50);
        assert_eq!(resolve_progress(StatusCategory::InProgress, Some(4.0), None, &config), 50);
    }

    #[test]
    fn test_progress_clamped_when_over_budget() {
        let raw = RawRecord::from_value(json!({
            "status": "in_progress",
            "estimatedHours": 10,
            "completedHours": 14
        }));
        assert_eq!(normalize(&raw, now()).progress_percent, 100);
    }

    #[test]
    fn test_customer_name_fallbacks() {
        let named = RawRecord::from_value(json!({
            "customer": { "firstname": " Asha ", "lastname": "Verma" }
        }));
        assert_eq!(normalize(&named, now()).customer_name, "Asha Verma");

        let first_only = RawRecord::from_value(json!({ "customer": { "firstName": "Ravi" } }));
        assert_eq!(normalize(&first_only, now()).customer_name, "Ravi");

        let email_only = RawRecord::from_value(json!({
            "customer": { "firstname": "", "email": "meera.k@example.com" }
        }));
        let view = normalize(&email_only, now());
        assert_eq!(view.customer_name, "meera.k");
        assert_eq!(view.customer_email, "meera.k@example.com");

        let bare_id = RawRecord::from_value(json!({ "customer": "64aa0001" }));
        let view = normalize(&bare_id, now());
        assert_eq!(view.customer_name, UNKNOWN_CUSTOMER);
        assert_eq!(view.customer_email, "");

        assert_eq!(normalize(&RawRecord::default(), now()).customer_name, UNKNOWN_CUSTOMER);
    }

    #[test]
    fn test_tailor_name() {
        let raw = RawRecord::from_value(json!({ "tailor": { "email": "stitch@example.com" } }));
        assert_eq!(normalize(&raw, now()).tailor_name, "stitch");
        assert_eq!(normalize(&RawRecord::default(), now()).tailor_name, UNASSIGNED_TAILOR);
    }

    #[test]
    fn test_display_id() {
        assert_eq!(display_id("65f1c2a9e4b0a1b2c3d4e5f6"), "#C3D4E5F6");
        assert_eq!(display_id("ab12"), "#AB12");
        assert_eq!(display_id(""), "#");
    }

    #[test]
    fn test_amount() {
        assert_eq!(parse_amount(Some(1250.0)), 1250.0);
        assert_eq!(parse_amount(Some(-5.0)), 0.0);
        assert_eq!(parse_amount(None), 0.0);

        let design = RawRecord::from_value(json!({ "price": "899" }));
        assert_eq!(normalize(&design, now()).amount, 899.0);

        let junk = RawRecord::from_value(json!({ "pricing": { "totalAmount": "free" } }));
        assert_eq!(normalize(&junk, now()).amount, 0.0);
    }

    #[test]
    fn test_tags_order_and_dedup() {
        let raw = RawRecord::from_value(json!({
            "type": "Custom",
            "bookingType": "stitching",
            "category": "custom",
            "orderDetails": { "garmentType": "Lehenga" }
        }));
        assert_eq!(normalize(&raw, now()).tags, vec!["Lehenga", "stitching", "Custom"]);
        assert!(normalize(&RawRecord::default(), now()).tags.is_empty());
    }

    #[test]
    fn test_empty_record_defaults() {
        let view = normalize(&RawRecord::default(), now());
        assert_eq!(view.id, "");
        assert_eq!(view.display_id, "#");
        assert_eq!(view.status_raw, "");
        assert_eq!(view.status_category, StatusCategory::Unknown);
        assert_eq!(view.payment_status, DEFAULT_PAYMENT_STATUS);
        assert_eq!(view.created_at, DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(view.progress_percent, 0);
    }

    #[test]
    fn test_unknown_status_is_kept() {
        let raw = RawRecord::from_value(json!({ "id": "x1", "status": "awaiting_fabric" }));
        let view = normalize(&raw, now());
        assert_eq!(view.status_raw, "awaiting_fabric");
        assert_eq!(view.status_category, StatusCategory::Unknown);
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let raw = RawRecord::from_value(json!({
            "_id": "65f1c2a9e4b0a1b2c3d4e5f6",
            "status": "confirmed",
            "pricing": { "totalAmount": 1200 },
            "customer": { "firstname": "Asha", "email": "asha@example.com" }
        }));
        assert_eq!(normalize(&raw, now()), normalize(&raw, now()));
    }

    #[test]
    fn test_fallback_deadline_saturates() {
        let config = NormalizeConfig {
            fallback_lead_days: 10_000_000_000_000,
            ..Default::default()
        };
        let view = normalize_with(&RawRecord::default(), now(), &config);
        assert_eq!(view.deadline, DateTime::<Utc>::MAX_UTC);
        assert_eq!(view.priority, Priority::Low);

        let past = NormalizeConfig {
            fallback_lead_days: -10_000_000_000_000,
            ..Default::default()
        };
        let view = normalize_with(&RawRecord::default(), now(), &past);
        assert_eq!(view.deadline, DateTime::<Utc>::MIN_UTC);
        assert_eq!(view.priority, Priority::High);

        let at_edge = normalize(&RawRecord::default(), DateTime::<Utc>::MAX_UTC);
        assert_eq!(at_edge.deadline, DateTime::<Utc>::MAX_UTC);
        assert_eq!(at_edge.days_remaining, 0);

        assert_eq!(fallback_deadline(now(), 7), now() + Duration::days(7));
    }

    #[test]
    fn test_normalize_all_preserves_order() {
        let raws = vec![RawRecord::new("a"), RawRecord::new("b"), RawRecord::new("c")];
        let ids: Vec<String> = normalize_all(&raws, now(), &NormalizeConfig::default())
            .into_iter()
            .map(|v| v.id)
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    fn arbitrary_json() -> impl Strategy<Value = serde_json::Value> {
        let leaf = prop_oneof![
            Just(serde_json::Value::Null),
            any::<bool>().prop_map(serde_json::Value::from),
            any::<i64>().prop_map(serde_json::Value::from),
            any::<f64>().prop_map(serde_json::Value::from),
            "[a-z0-9@ ._-]{0,12}".prop_map(serde_json::Value::from),
        ];
        leaf.prop_recursive(3, 16, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(serde_json::Value::from),
                prop::collection::vec((field_name(), inner), 0..6).prop_map(|fields| {
                    serde_json::Value::Object(fields.into_iter().collect())
                }),
            ]
        })
    }

    fn field_name() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("id".to_string()),
            Just("_id".to_string()),
            Just("status".to_string()),
            Just("priority".to_string()),
            Just("orderDetails".to_string()),
            Just("deliveryDate".to_string()),
            Just("garmentType".to_string()),
            Just("pricing".to_string()),
            Just("totalAmount".to_string()),
            Just("timeline".to_string()),
            Just("estimatedDelivery".to_string()),
            Just("estimatedHours".to_string()),
            Just("completedHours".to_string()),
            Just("customer".to_string()),
            Just("firstname".to_string()),
            Just("email".to_string()),
            Just("createdAt".to_string()),
        ]
    }

    proptest! {
        #[test]
        fn prop_normalize_is_total(value in arbitrary_json()) {
            let raw = RawRecord::from_value(value);
            let view = normalize(&raw, now());

            prop_assert!(view.progress_percent <= 100);
            prop_assert!(view.amount.is_finite() && view.amount >= 0.0);
            prop_assert!(view.display_id.starts_with('#'));
            prop_assert!(!view.customer_name.is_empty());
            prop_assert_eq!(view.days_remaining, days_remaining(view.deadline, now()));
            prop_assert_eq!(&view, &normalize(&raw, now()));
        }
    }
}
