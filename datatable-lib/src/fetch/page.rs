//! Page state and the list response envelope.

use serde::Deserialize;

use crate::error::ApiError;
use crate::model::Item;

/// Pagination window of a remote list.
///
/// `current_page` is 1-based and never exceeds `total_pages`; a request for a
/// page outside `1..=total_pages` is rejected before dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    pub current_page: usize,
    pub items_per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl PageState {
    /// First page of an empty list with the given page size.
    pub fn new(items_per_page: usize) -> Self {
        Self {
            current_page: 1,
            items_per_page,
            total_items: 0,
            total_pages: 1,
        }
    }

    /// Returns `true` if `page` is a valid target for navigation.
    pub fn contains(&self, page: usize) -> bool {
        page >= 1 && page <= self.total_pages
    }

    /// Returns `true` if there is a page after the current one.
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// Pagination metadata as sent by the server.
///
/// Every field is optional; absent or zero values fall back to defaults when
/// converted into a [`PageState`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageMeta {
    pub current_page: Option<usize>,
    pub per_page: Option<usize>,
    pub total: Option<usize>,
    pub last_page: Option<usize>,
}

impl PageMeta {
    /// Builds the page state this metadata describes.
    ///
    /// `fallback_page_size` is used when the server omits `per_page`.
    pub fn to_page_state(&self, fallback_page_size: usize) -> PageState {
        PageState {
            current_page: self.current_page.filter(|n| *n > 0).unwrap_or(1),
            items_per_page: self
                .per_page
                .filter(|n| *n > 0)
                .unwrap_or(fallback_page_size),
            total_items: self.total.unwrap_or(0),
            total_pages: self.last_page.filter(|n| *n > 0).unwrap_or(1),
        }
    }

    /// `current_page < last_page`; unknown values mean no more pages.
    pub fn has_more(&self) -> bool {
        match (self.current_page, self.last_page) {
            (Some(current), Some(last)) => current < last,
            _ => false,
        }
    }
}

/// Body of a list response: `{data: [...], meta?: {...}}`.
///
/// The presence of `meta` distinguishes a paginated list from a plain one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub data: Vec<Item>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

impl ListResponse {
    /// Decodes a response body.
    pub fn parse(body: serde_json::Value) -> Result<Self, ApiError> {
        serde_json::from_value(body).map_err(|e| ApiError::parse(format!("invalid list response: {e}")))
    }

    /// Returns `true` if the response carried pagination metadata.
    pub fn is_paginated(&self) -> bool {
        self.meta.is_some()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_paginated() {
        let response = ListResponse::parse(json!({
            "data": [{"id": 1}, {"id": 2}],
            "meta": {"current_page": 2, "per_page": 2, "total": 5, "last_page": 3}
        }))
        .unwrap();

        assert!(response.is_paginated());
        assert_eq!(response.data.len(), 2);
        let meta = response.meta.unwrap();
        assert!(meta.has_more());
        assert_eq!(
            meta.to_page_state(10),
            PageState {
                current_page: 2,
                items_per_page: 2,
                total_items: 5,
                total_pages: 3,
            }
        );
    }

    #[test]
    fn test_meta_defaults() {
        let meta = PageMeta {
            current_page: Some(0),
            ..PageMeta::default()
        };
        assert_eq!(meta.to_page_state(25), PageState::new(25));
        assert!(!meta.has_more());
    }

    #[test]
    fn test_parse_plain_list_and_rejects_garbage() {
        let response = ListResponse::parse(json!({"data": [{"id": "a"}]})).unwrap();
        assert!(!response.is_paginated());
        assert_eq!(response.data.len(), 1);

        assert!(matches!(
            ListResponse::parse(json!({"data": 3})),
            Err(ApiError::Parse { .. })
        ));
    }

    #[test]
    fn test_page_contains() {
        let page = PageState {
            total_pages: 4,
            ..PageState::new(10)
        };
        assert!(!page.contains(0));
        assert!(page.contains(1));
        assert!(page.contains(4));
        assert!(!page.contains(5));
    }
}
