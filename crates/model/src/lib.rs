//! Core data model for the tailorboard order pipeline.
//!
//! This crate defines the types shared by every pipeline stage:
//! - `RawRecord`: an order/booking/design document as sent by a backend
//! - `ViewRecord`: the normalized, fully-populated record used for display
//! - `StatusCategory`, `Priority`: the closed display vocabularies
//! - `QueryParams`, `QueryResult`, `Statistics`: query and summary values

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod lenient;
pub mod query;
pub mod raw;
pub mod stats;

pub use query::{QueryParams, QueryResult, SortBy, SortOrder, DEFAULT_PAGE_SIZE};
pub use raw::{records_from_response, OrderDetails, Party, PartyRef, Payment, Pricing, RawRecord, Timeline};
pub use stats::Statistics;

/// Errors from parsing user-supplied vocabulary names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("Unknown status: {0}")]
    UnknownStatus(String),
    #[error("Unknown priority: {0}")]
    UnknownPriority(String),
    #[error("Unknown sort key: {0}")]
    UnknownSortKey(String),
    #[error("Unknown sort order: {0}")]
    UnknownSortOrder(String),
}

/// Display category of an order's lifecycle status.
///
/// Declaration order is the status sort order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCategory {
    Pending,
    Confirmed,
    InProgress,
    /// Ready for fitting or pickup
    Ready,
    Completed,
    Delivered,
    Cancelled,
    /// Any status outside the known vocabulary
    #[default]
    Unknown,
}

impl From<&str> for StatusCategory {
    fn from(s: &str) -> Self {
        let folded: String = s
            .trim()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c.to_ascii_lowercase() })
            .collect();

        match folded.as_str() {
            "pending" => Self::Pending,
            "confirmed" => Self::Confirmed,
            "in_progress" => Self::InProgress,
            "ready_for_fitting" | "ready" => Self::Ready,
            "completed" => Self::Completed,
            "delivered" => Self::Delivered,
            "cancelled" | "canceled" => Self::Cancelled,
            _ => Self::Unknown,
        }
    }
}

impl StatusCategory {
    pub const ALL: [Self; 8] = [
        Self::Pending,
        Self::Confirmed,
        Self::InProgress,
        Self::Ready,
        Self::Completed,
        Self::Delivered,
        Self::Cancelled,
        Self::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::InProgress => "in_progress",
            Self::Ready => "ready",
            Self::Completed => "completed",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }

    /// Get a human-readable label for this status.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::InProgress => "In Progress",
            Self::Ready => "Ready for Fitting",
            Self::Completed => "Completed",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
            Self::Unknown => "Unknown",
        }
    }

    /// Whether no further work is expected on the order.
    pub fn is_closed(self) -> bool {
        matches!(self, Self::Completed | Self::Delivered | Self::Cancelled)
    }

    /// Parse a status filter. `"all"` (or empty) means no filter.
    pub fn parse_filter(s: &str) -> Result<Option<Self>, ModelError> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(None);
        }
        match Self::from(trimmed) {
            Self::Unknown if !trimmed.eq_ignore_ascii_case("unknown") => {
                Err(ModelError::UnknownStatus(trimmed.to_string()))
            }
            status => Ok(Some(status)),
        }
    }
}

/// Urgency of an order. Declaration order is ascending urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl FromStr for Priority {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ModelError::UnknownPriority(s.to_string())),
        }
    }
}

/// A normalized record ready for querying, aggregation and display.
///
/// Every field is populated; missing input has already been defaulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewRecord {
    pub id: String,

    /// Short form of the id, e.g. `#D4E5F6A1`
    pub display_id: String,

    pub customer_name: String,
    pub customer_email: String,
    pub tailor_name: String,

    /// Status exactly as received
    pub status_raw: String,
    pub status_category: StatusCategory,
    pub priority: Priority,

    /// Order total, never negative or NaN
    pub amount: f64,
    pub payment_status: String,

    pub created_at: DateTime<Utc>,
    pub deadline: DateTime<Utc>,

    /// Whole days until the deadline, negative once overdue
    pub days_remaining: i64,

    /// Completion in percent, 0..=100
    pub progress_percent: u8,

    pub tags: Vec<String>,
}
