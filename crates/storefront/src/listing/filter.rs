//! Filter criteria for list views and the queries derived from them.

use serde::{Deserialize, Serialize};

/// Category value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "All";

/// The filters a shopper has applied to a list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Category name, or [`ALL_CATEGORIES`].
    pub category: String,
    /// Free-text search as typed.
    pub search_text: String,
    /// Selected tag slug; empty when none. At most one tag is active.
    pub tag: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            category: ALL_CATEGORIES.to_string(),
            search_text: String::new(),
            tag: String::new(),
        }
    }
}

impl FilterState {
    /// Select `tag`, or clear it if it is already selected.
    pub fn toggle_tag(&mut self, tag: &str) {
        if self.tag == tag {
            self.tag.clear();
        } else {
            self.tag = tag.to_string();
        }
    }
}

/// One page request against a CMS collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page_size: u32,
    /// Cursor to continue after; empty for the first page.
    pub cursor: String,
    pub category: String,
    pub search_text: String,
    pub tag: String,
}

impl PageQuery {
    /// Request the first page matching `filter`.
    #[must_use]
    pub fn first_page(page_size: u32, filter: &FilterState) -> Self {
        Self::next_page(page_size, filter, String::new())
    }

    /// Request the page after `cursor` matching `filter`.
    #[must_use]
    pub fn next_page(page_size: u32, filter: &FilterState, cursor: String) -> Self {
        Self {
            page_size,
            cursor,
            category: filter.category.clone(),
            search_text: filter.search_text.clone(),
            tag: filter.tag.clone(),
        }
    }

    #[must_use]
    pub fn is_first_page(&self) -> bool {
        self.cursor.is_empty()
    }

    /// Cursor to send, `None` for the first page.
    #[must_use]
    pub fn after(&self) -> Option<&str> {
        non_blank(&self.cursor)
    }

    /// Category to filter on; `None` for "All" or blank.
    #[must_use]
    pub fn category_filter(&self) -> Option<&str> {
        non_blank(&self.category).filter(|c| !c.eq_ignore_ascii_case(ALL_CATEGORIES))
    }

    /// Trimmed search text; `None` when blank.
    #[must_use]
    pub fn search_filter(&self) -> Option<&str> {
        non_blank(&self.search_text)
    }

    /// Trimmed tag; `None` when blank.
    #[must_use]
    pub fn tag_filter(&self) -> Option<&str> {
        non_blank(&self.tag)
    }
}

fn non_blank(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        let filter = FilterState::default();
        assert_eq!(filter.category, "All");
        assert!(filter.search_text.is_empty());
        assert!(filter.tag.is_empty());
    }

    #[test]
    fn test_toggle_same_tag_clears() {
        let mut filter = FilterState::default();
        filter.toggle_tag("pvc");
        assert_eq!(filter.tag, "pvc");
        filter.toggle_tag("pvc");
        assert_eq!(filter.tag, "");
    }

    #[test]
    fn test_toggle_other_tag_replaces() {
        let mut filter = FilterState::default();
        filter.toggle_tag("pvc");
        filter.toggle_tag("go");
        assert_eq!(filter.tag, "go");
    }

    #[test]
    fn test_query_filters() {
        let filter = FilterState {
            category: "All".to_string(),
            search_text: "  ốp tường ".to_string(),
            tag: String::new(),
        };
        let query = PageQuery::first_page(9, &filter);
        assert!(query.is_first_page());
        assert_eq!(query.after(), None);
        assert_eq!(query.category_filter(), None);
        assert_eq!(query.search_filter(), Some("ốp tường"));
        assert_eq!(query.tag_filter(), None);

        let filter = FilterState {
            category: "Lam Sóng".to_string(),
            search_text: String::new(),
            tag: "pvc".to_string(),
        };
        let query = PageQuery::next_page(9, &filter, "Y3Vyc29yOjk=".to_string());
        assert!(!query.is_first_page());
        assert_eq!(query.after(), Some("Y3Vyc29yOjk="));
        assert_eq!(query.category_filter(), Some("Lam Sóng"));
        assert_eq!(query.tag_filter(), Some("pvc"));
    }
}
