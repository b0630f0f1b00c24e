//! Filterable, incrementally loaded list views over CMS collections.
//!
//! A [`ListController`] backs the blog index and the project portfolio. It
//! starts from the first page rendered by the server, refetches the first
//! page whenever the filters change (debounced), and appends further pages on
//! request.
//!
//! # Protocol
//!
//! - A filter change bumps the *generation*, enters [`Phase::Filtering`] and
//!   restarts the debounce timer. When the timer fires, the first page for
//!   the current filters is fetched and **replaces** the list.
//! - [`ListController::load_more`] runs only while [`Phase::Idle`] with a next
//!   page and a non-empty end cursor available. The result is **appended**.
//! - A response is applied only if its generation is still current. Anything
//!   older is dropped when it resolves; in-flight requests are never aborted.
//!
//! All methods that start work spawn Tokio tasks and must be called from
//! within a Tokio runtime.

pub mod filter;

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use dainam_core::{ListPage, PageInfo};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::wordpress::CmsError;

pub use filter::{ALL_CATEGORIES, FilterState, PageQuery};

/// A CMS collection that can be read a page at a time.
pub trait PageSource: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;

    /// Fetch one page. Must not have side effects.
    fn fetch_page(
        &self,
        query: PageQuery,
    ) -> impl Future<Output = Result<ListPage<Self::Item>, CmsError>> + Send;
}

/// Paging and debounce settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListConfig {
    pub page_size: u32,
    /// Quiet interval after the last filter change before refetching.
    pub debounce: Duration,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: 9,
            debounce: Duration::from_millis(500),
        }
    }
}

/// What the controller is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing in flight.
    Idle,
    /// A filter change is debouncing or its first page is in flight.
    Filtering,
    /// A next-page fetch is in flight.
    LoadingMore,
}

/// Observable state of a list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSnapshot<T> {
    pub items: Vec<T>,
    pub page_info: PageInfo,
    pub filter: FilterState,
    pub phase: Phase,
    /// The last applied fetch failed and was replaced by an empty page.
    pub fetch_failed: bool,
    /// Bumped on every effective filter change.
    pub generation: u64,
}

#[derive(Debug, Clone, Copy)]
enum Apply {
    Replace,
    Append,
}

/// Controller for one mounted list view.
///
/// Dropping it cancels a pending debounce timer. Fetches already in flight
/// finish on their own and their results are discarded.
pub struct ListController<S: PageSource> {
    shared: Arc<Shared<S>>,
}

struct Shared<S: PageSource> {
    source: S,
    config: ListConfig,
    state: watch::Sender<ListSnapshot<S::Item>>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl<S: PageSource> ListController<S> {
    /// Create a controller seeded with the server-rendered first page.
    pub fn new(source: S, config: ListConfig, initial: ListPage<S::Item>) -> Self {
        let (state, _) = watch::channel(ListSnapshot {
            items: initial.items,
            page_info: initial.page_info,
            filter: FilterState::default(),
            phase: Phase::Idle,
            fetch_failed: false,
            generation: 0,
        });

        Self {
            shared: Arc::new(Shared {
                source,
                config,
                state,
                timer: Mutex::new(None),
            }),
        }
    }

    // =========================================================================
    // Filters
    // =========================================================================

    /// Select a category ([`ALL_CATEGORIES`] for none).
    pub fn set_category(&self, category: impl Into<String>) {
        let category = category.into();
        self.update_filter(|f| f.category = category);
    }

    /// Replace the search text.
    pub fn set_search_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.update_filter(|f| f.search_text = text);
    }

    /// Select a tag, or clear it if it is already selected.
    pub fn toggle_tag(&self, tag: &str) {
        self.update_filter(|f| f.toggle_tag(tag));
    }

    /// Reset every filter to its default.
    pub fn clear_filters(&self) {
        self.update_filter(|f| *f = FilterState::default());
    }

    fn update_filter(&self, change: impl FnOnce(&mut FilterState)) {
        // Held across the state update so timers are replaced in generation order
        let mut timer = self.shared.lock_timer();

        let mut scheduled = None;
        self.shared.state.send_if_modified(|s| {
            let mut next = s.filter.clone();
            change(&mut next);
            if next == s.filter {
                return false;
            }
            s.filter = next;
            s.generation += 1;
            s.phase = Phase::Filtering;
            scheduled = Some(s.generation);
            true
        });

        let Some(generation) = scheduled else {
            return;
        };

        if let Some(previous) = timer.take() {
            previous.abort();
        }
        *timer = Some(Arc::clone(&self.shared).schedule_refetch(generation));
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    /// Fetch the next page and append it.
    ///
    /// Returns `false` without fetching while another fetch is pending or when
    /// there is no next page.
    pub fn load_more(&self) -> bool {
        let page_size = self.shared.config.page_size;
        let mut request = None;

        self.shared.state.send_if_modified(|s| {
            // An empty cursor would re-request the first page
            if s.phase != Phase::Idle
                || !s.page_info.has_next_page
                || s.page_info.end_cursor.is_empty()
            {
                return false;
            }
            s.phase = Phase::LoadingMore;
            request = Some((
                s.generation,
                PageQuery::next_page(page_size, &s.filter, s.page_info.end_cursor.clone()),
            ));
            true
        });

        let Some((generation, query)) = request else {
            return false;
        };

        debug!(generation, cursor = %query.cursor, "Loading next page");
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            let result = shared.source.fetch_page(query).await;
            shared.apply(generation, result, Apply::Append);
        });
        true
    }

    // =========================================================================
    // Observation
    // =========================================================================

    /// Current state.
    #[must_use]
    pub fn snapshot(&self) -> ListSnapshot<S::Item> {
        self.shared.state.borrow().clone()
    }

    /// Receive every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ListSnapshot<S::Item>> {
        self.shared.state.subscribe()
    }

    /// Wait until nothing is pending and return the state at that point.
    pub async fn settled(&self) -> ListSnapshot<S::Item> {
        let mut rx = self.subscribe();
        match rx.wait_for(|s| s.phase == Phase::Idle).await {
            Ok(state) => state.clone(),
            Err(_) => self.snapshot(),
        }
    }
}

impl<S: PageSource> Drop for ListController<S> {
    fn drop(&mut self) {
        if let Some(timer) = self.shared.lock_timer().take() {
            timer.abort();
        }
    }
}

impl<S: PageSource> Shared<S> {
    fn lock_timer(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wait out the debounce interval, then fetch the first page in a task of
    /// its own so aborting the timer never cancels a request in flight.
    fn schedule_refetch(self: Arc<Self>, generation: u64) -> JoinHandle<()> {
        tokio::spawn(async move {
            tokio::time::sleep(self.config.debounce).await;

            let query = {
                let s = self.state.borrow();
                if s.generation != generation {
                    return;
                }
                PageQuery::first_page(self.config.page_size, &s.filter)
            };

            debug!(
                generation,
                category = %query.category,
                search = %query.search_text,
                tag = %query.tag,
                "Refetching first page"
            );
            tokio::spawn(async move {
                let result = self.source.fetch_page(query).await;
                self.apply(generation, result, Apply::Replace);
            });
        })
    }

    fn apply(&self, generation: u64, result: Result<ListPage<S::Item>, CmsError>, how: Apply) {
        let (page, failed) = match result {
            Ok(page) => (page, false),
            Err(e) => {
                warn!(error = %e, generation, "List fetch failed, showing no results");
                (ListPage::empty(), true)
            }
        };

        let applied = self.state.send_if_modified(|s| {
            if s.generation != generation {
                return false;
            }
            match how {
                Apply::Replace => s.items = page.items,
                Apply::Append => s.items.extend(page.items),
            }
            s.page_info = page.page_info;
            s.fetch_failed = failed;
            s.phase = Phase::Idle;
            true
        });

        if !applied {
            debug!(generation, "Discarding stale list response");
        }
    }
}
