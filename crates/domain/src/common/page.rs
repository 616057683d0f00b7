//! Paging types shared by every remote search.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u32,
    pub page_number: u32,
    pub page_size: u32,
}

impl<T> Page<T> {
    pub fn empty(page_number: u32, page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            page_number,
            page_size,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Search request accepted by every entity's remote search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedQuery {
    pub page_number: u32,
    pub page_size: u32,
    pub search_term: Option<String>,
    pub sort_by: Option<String>,
    pub sort_direction: SortDirection,
    /// Entity-specific filters, e.g. `"districtId" -> "4"`.
    pub filters: BTreeMap<String, String>,
}

impl PagedQuery {
    pub fn page(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number,
            page_size,
            search_term: None,
            sort_by: None,
            sort_direction: SortDirection::Ascending,
            filters: BTreeMap::new(),
        }
    }

    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    pub fn sorted_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_by = Some(field.into());
        self.sort_direction = direction;
        self
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }
}

impl Default for PagedQuery {
    fn default() -> Self {
        Self::page(1, 25)
    }
}
