//! Cursor pagination records.

use serde::{Deserialize, Serialize};

/// Relay-style pagination cursor state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether another page follows this one.
    pub has_next_page: bool,
    /// Opaque cursor of the last item; empty when there is none.
    #[serde(default)]
    pub end_cursor: String,
}

impl PageInfo {
    /// Pagination state of a collection with nothing left to load.
    #[must_use]
    pub const fn exhausted() -> Self {
        Self {
            has_next_page: false,
            end_cursor: String::new(),
        }
    }
}

/// A page of records plus its cursor state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub page_info: PageInfo,
}

impl<T> ListPage<T> {
    #[must_use]
    pub const fn new(items: Vec<T>, page_info: PageInfo) -> Self {
        Self { items, page_info }
    }

    /// An empty page with no next page.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            page_info: PageInfo::exhausted(),
        }
    }
}

impl<T> Default for ListPage<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_page_info_wire_names() {
        let info = PageInfo {
            has_next_page: true,
            end_cursor: "YXJyYXljb25uZWN0aW9uOjQy".to_string(),
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["hasNextPage"], true);
        assert_eq!(json["endCursor"], "YXJyYXljb25uZWN0aW9uOjQy");
    }

    #[test]
    fn test_missing_end_cursor_defaults_empty() {
        let info: PageInfo = serde_json::from_str(r#"{"hasNextPage": false}"#).unwrap();
        assert_eq!(info, PageInfo::exhausted());
    }

    #[test]
    fn test_empty_page() {
        let page: ListPage<u8> = ListPage::empty();
        assert!(page.items.is_empty());
        assert!(!page.page_info.has_next_page);
    }
}
