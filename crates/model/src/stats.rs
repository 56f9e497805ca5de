//! Summary statistics over a set of view records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Priority, StatusCategory};

/// Dashboard counters for a record set.
///
/// Both maps hold every enum key, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub count_by_status: BTreeMap<StatusCategory, usize>,
    pub count_by_priority: BTreeMap<Priority, usize>,
    pub total_amount: f64,
    pub total_count: usize,

    /// Records not yet completed, delivered or cancelled
    pub active_count: usize,

    /// Active records past their deadline
    pub overdue_count: usize,
}

impl Default for Statistics {
    fn default() -> Self {
        Self {
            count_by_status: StatusCategory::ALL.iter().map(|s| (*s, 0)).collect(),
            count_by_priority: Priority::ALL.iter().map(|p| (*p, 0)).collect(),
            total_amount: 0.0,
            total_count: 0,
            active_count: 0,
            overdue_count: 0,
        }
    }
}
