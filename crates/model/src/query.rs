//! Query parameters and paged results.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{lenient, ModelError, Priority, StatusCategory, ViewRecord};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Field to sort records by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    #[default]
    CreatedAt,
    Amount,
    Status,
    CustomerName,
    Deadline,
}

impl FromStr for SortBy {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match key.as_str() {
            "createdat" | "date" => Ok(Self::CreatedAt),
            "amount" | "totalamount" => Ok(Self::Amount),
            "status" => Ok(Self::Status),
            "customername" | "customer" => Ok(Self::CustomerName),
            "deadline" | "deliverydate" => Ok(Self::Deadline),
            _ => Err(ModelError::UnknownSortKey(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    /// Newest first
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            _ => Err(ModelError::UnknownSortOrder(s.to_string())),
        }
    }
}

/// Search, filter, sort and paging parameters for one query.
///
/// Decoding never fails: unusable values fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    /// Case-insensitive substring; empty matches everything
    #[serde(default, deserialize_with = "lenient::text")]
    pub search_text: String,

    /// `None` (or `"all"` on the wire) disables the filter
    #[serde(default, deserialize_with = "lenient::status_filter")]
    pub status_filter: Option<StatusCategory>,

    #[serde(default, deserialize_with = "lenient::priority_filter")]
    pub priority_filter: Option<Priority>,

    #[serde(default, deserialize_with = "lenient::sort_by")]
    pub sort_by: SortBy,

    #[serde(default, deserialize_with = "lenient::sort_order")]
    pub sort_order: SortOrder,

    /// 1-based page number; 0 is treated as 1
    #[serde(default = "default_page", deserialize_with = "lenient::page")]
    pub page: usize,

    /// 0 is treated as [`DEFAULT_PAGE_SIZE`]
    #[serde(default = "default_page_size", deserialize_with = "lenient::page")]
    pub page_size: usize,
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            status_filter: None,
            priority_filter: None,
            sort_by: SortBy::default(),
            sort_order: SortOrder::default(),
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn with_status(mut self, status: StatusCategory) -> Self {
        self.status_filter = Some(status);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority_filter = Some(priority);
        self
    }

    pub fn with_sort(mut self, sort_by: SortBy, sort_order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.sort_order = sort_order;
        self
    }

    pub fn with_page(mut self, page: usize, page_size: usize) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub items: Vec<ViewRecord>,

    /// Matches before paging
    pub total_count: usize,
    pub total_pages: usize,

    /// Effective page number after coercion
    pub page: usize,
    pub page_size: usize,
}
