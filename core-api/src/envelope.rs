//! Response envelopes
//!
//! Every single-entity response is wrapped in `{data, success, message?}`;
//! every list response is paginated.

use serde::{Deserialize, Serialize};

/// Single-entity envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub data: T,
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn default_success() -> bool {
    true
}

/// Envelope for endpoints that return no payload (logout, verify-email, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Acknowledgement {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Page size the backend applies when a request names none
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// One page of a list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> Paginated<T> {
    /// Expected page count for `total` items at `limit` per page
    pub fn expected_total_pages(total: u64, limit: u32) -> u32 {
        if limit == 0 {
            return 0;
        }
        let pages = total.div_ceil(u64::from(limit));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Whether the page satisfies the pagination contract
    ///
    /// `data.len() <= limit` and `total_pages == ceil(total / limit)`.
    pub fn is_consistent(&self) -> bool {
        self.data.len() <= self.limit as usize
            && self.total_pages == Self::expected_total_pages(self.total, self.limit)
    }

    pub fn has_next_page(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous_page(&self) -> bool {
        self.page > 1
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Transform the items while keeping the page metadata
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            total: 0,
            page: 1,
            limit: 0,
            total_pages: 0,
        }
    }
}

/// Page selection for list endpoints without dedicated filters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl PaginationParams {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(len: usize, total: u64, limit: u32, total_pages: u32) -> Paginated<u8> {
        Paginated {
            data: vec![0; len],
            total,
            page: 1,
            limit,
            total_pages,
        }
    }

    #[test]
    fn test_pagination_contract() {
        assert!(page(10, 25, 10, 3).is_consistent());
        assert!(page(5, 5, 10, 1).is_consistent());
        assert!(page(0, 0, 10, 0).is_consistent());
        assert!(page(0, 0, 0, 0).is_consistent());

        assert!(!page(11, 25, 10, 3).is_consistent());
        assert!(!page(10, 25, 10, 2).is_consistent());
    }

    #[test]
    fn test_envelope_success_defaults_to_true() {
        let response: ApiResponse<u32> = serde_json::from_str(r#"{"data":7}"#).unwrap();
        assert_eq!(response.data, 7);
        assert!(response.success);
        assert!(response.message.is_none());
    }

    #[test]
    fn test_paginated_wire_format() {
        let page: Paginated<String> = serde_json::from_str(
            r#"{"data":["a"],"total":21,"page":3,"limit":10,"totalPages":3}"#,
        )
        .unwrap();
        assert!(page.is_consistent());
        assert!(!page.has_next_page());
        assert!(page.has_previous_page());
    }
}
