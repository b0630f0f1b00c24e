//! Paged list endpoints for the blog index and project portfolio.

use axum::{
    Json,
    extract::{Query, State},
};
use dainam_core::{ListPage, Post, Project};
use serde::Deserialize;
use tracing::{instrument, warn};

use crate::config::MAX_PAGE_SIZE;
use crate::error::{AppError, Result};
use crate::listing::{ALL_CATEGORIES, FilterState, PageQuery, PageSource};
use crate::state::AppState;

/// Query string accepted by the list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Page size; the configured default when absent.
    pub first: Option<u32>,
    #[serde(default)]
    pub after: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub tag: String,
}

impl ListParams {
    /// Turn the parameters into a page query.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` if `first` is outside `1..=MAX_PAGE_SIZE`.
    pub fn into_query(self, default_page_size: u32) -> Result<PageQuery> {
        let first = self.first.unwrap_or(default_page_size);
        if !(1..=MAX_PAGE_SIZE).contains(&first) {
            return Err(AppError::BadRequest(format!(
                "first must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }

        let filter = FilterState {
            category: if self.category.trim().is_empty() {
                ALL_CATEGORIES.to_string()
            } else {
                self.category
            },
            search_text: self.search,
            tag: self.tag,
        };
        Ok(PageQuery::next_page(first, &filter, self.after))
    }
}

/// One page of blog posts.
#[instrument(skip(state))]
pub async fn posts(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListPage<Post>>> {
    let query = params.into_query(state.config().listing.page_size)?;
    Ok(Json(fetch_or_empty(&state.wordpress().posts(), query).await))
}

/// One page of portfolio projects.
#[instrument(skip(state))]
pub async fn projects(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListPage<Project>>> {
    let query = params.into_query(state.config().listing.page_size)?;
    Ok(Json(fetch_or_empty(&state.wordpress().projects(), query).await))
}

/// A failed fetch is served as an empty, exhausted page so list views fall
/// back to their "no results" state.
async fn fetch_or_empty<S: PageSource>(source: &S, query: PageQuery) -> ListPage<S::Item> {
    match source.fetch_page(query).await {
        Ok(page) => page,
        Err(e) => {
            warn!(error = %e, "List fetch failed, serving empty page");
            ListPage::empty()
        }
    }
}
