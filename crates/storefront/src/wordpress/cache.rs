//! Cache types for WordPress list responses.

use dainam_core::{ListPage, Post, Project};

/// Cache key for list pages. Search queries are never cached.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Posts {
        page_size: u32,
        cursor: String,
        category: Option<String>,
        tag: Option<String>,
    },
    Projects {
        page_size: u32,
        cursor: String,
        category: Option<String>,
    },
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Posts(ListPage<Post>),
    Projects(ListPage<Project>),
}
