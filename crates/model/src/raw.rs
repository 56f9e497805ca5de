//! Order, booking and design documents as returned by the backends.
//!
//! No field is guaranteed. Absent, `null` and wrong-typed values all decode
//! to `None`, so decoding a JSON object into a [`RawRecord`] never fails.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::lenient;

/// Keys under which backends wrap their record arrays.
pub const ENVELOPE_KEYS: [&str; 5] = ["orders", "bookings", "designs", "data", "items"];

/// A raw order, booking or design document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Document id as stored by the backend (`_id`)
    #[serde(rename = "_id", default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,

    /// Generic type discriminator (`type`)
    #[serde(rename = "type", default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub booking_type: Option<String>,

    /// Design category
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Explicit priority as stored, unvalidated
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,

    #[serde(default, deserialize_with = "lenient::object", skip_serializing_if = "Option::is_none")]
    pub order_details: Option<OrderDetails>,

    #[serde(default, deserialize_with = "lenient::object", skip_serializing_if = "Option::is_none")]
    pub pricing: Option<Pricing>,

    /// Flat price carried by design documents
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    #[serde(default, deserialize_with = "lenient::object", skip_serializing_if = "Option::is_none")]
    pub payment: Option<Payment>,

    #[serde(default, deserialize_with = "lenient::object", skip_serializing_if = "Option::is_none")]
    pub timeline: Option<Timeline>,

    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,

    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub completed_hours: Option<f64>,

    #[serde(default, deserialize_with = "lenient::timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "lenient::timestamp", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "lenient::party", skip_serializing_if = "Option::is_none")]
    pub customer: Option<PartyRef>,

    #[serde(default, deserialize_with = "lenient::party", skip_serializing_if = "Option::is_none")]
    pub tailor: Option<PartyRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub garment_type: Option<String>,

    #[serde(default, deserialize_with = "lenient::count", skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,

    #[serde(default, deserialize_with = "lenient::timestamp", skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    #[serde(default, deserialize_with = "lenient::timestamp", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "lenient::timestamp", skip_serializing_if = "Option::is_none")]
    pub estimated_delivery: Option<DateTime<Utc>>,
}

/// A customer or tailor reference: populated document or bare id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PartyRef {
    Embedded(Party),
    Id(String),
}

/// An embedded user document.
///
/// Backends disagree on name casing, so both `firstname` and `firstName`
/// are kept. The lowercase spelling takes precedence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Party {
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "_id", default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,

    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,

    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,

    #[serde(rename = "firstName", default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(rename = "lastName", default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl RawRecord {
    /// Create a record carrying only an id, for testing.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Decode one document. Non-object values yield an empty record.
    pub fn from_value(value: Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }
        serde_json::from_value(value).unwrap_or_default()
    }

    /// The identifier to display: `id`, falling back to `_id`.
    pub fn effective_id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .or(self.object_id.as_deref())
    }

    pub fn delivery_date(&self) -> Option<DateTime<Utc>> {
        self.order_details.as_ref().and_then(|d| d.delivery_date)
    }

    pub fn estimated_delivery(&self) -> Option<DateTime<Utc>> {
        self.timeline.as_ref().and_then(|t| t.estimated_delivery)
    }

    pub fn garment_type(&self) -> Option<&str> {
        self.order_details.as_ref().and_then(|d| d.garment_type.as_deref())
    }

    pub fn total_amount(&self) -> Option<f64> {
        self.pricing.as_ref().and_then(|p| p.total_amount)
    }

    pub fn payment_status(&self) -> Option<&str> {
        self.payment.as_ref().and_then(|p| p.status.as_deref())
    }
}

impl Party {
    pub fn first(&self) -> Option<&str> {
        self.firstname.as_deref().or(self.first_name.as_deref())
    }

    pub fn last(&self) -> Option<&str> {
        self.lastname.as_deref().or(self.last_name.as_deref())
    }
}

/// Unwrap a backend response into its records.
///
/// Accepts a bare array, or an object holding the array under one of
/// [`ENVELOPE_KEYS`]. Anything else is an empty batch.
pub fn records_from_response(response: Value) -> Vec<RawRecord> {
    let items = match response {
        Value::Array(items) => items,
        Value::Object(mut map) => ENVELOPE_KEYS
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    };

    items.into_iter().map(RawRecord::from_value).collect()
}
