//! WordPress GraphQL client.
//!
//! # Architecture
//!
//! - Posts and projects come from WPGraphQL, orders go through WooGraphQL
//! - WordPress is the source of truth; nothing is synced locally
//! - List pages are cached in memory via `moka` (5 minute TTL); search
//!   queries always go to the CMS
//!
//! # Example
//!
//! ```rust,ignore
//! use dainam_storefront::wordpress::WordPressClient;
//!
//! let client = WordPressClient::new(&config.wordpress);
//! let query = PageQuery::first_page(9, &FilterState::default());
//! let page = client.fetch_posts(&query).await?;
//! ```

mod cache;
mod conversions;
pub mod queries;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dainam_core::{CartItem, ContactForm, ListPage, OrderLine, OrderResponse, Post, Project};
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error, instrument, warn};

use crate::checkout::OrderService;
use crate::config::WordPressConfig;
use crate::listing::{PageQuery, PageSource};

use cache::{CacheKey, CacheValue};
use conversions::{convert_order, convert_post_connection, convert_project_connection};
use queries::{
    CREATE_ORDER, CreateOrderData, CreateOrderInput, CreateOrderVariables, CustomerAddress,
    GET_POSTS, GET_PROJECTS, GraphQLRequest, GraphQLResponse, LineItemInput, ListVariables,
    PostWhere, PostsData, ProjectWhere, ProjectsData, TaxQuery,
};

/// Shown when the CMS is throttling us.
const MSG_BUSY: &str = "Hệ thống đang bận, vui lòng thử lại sau ít phút.";
/// Shown for every other order failure.
const MSG_ORDER_FAILED: &str =
    "Không thể tạo đơn hàng lúc này. Vui lòng thử lại hoặc gọi hotline để được hỗ trợ.";

// =============================================================================
// Errors
// =============================================================================

/// Errors that can occur when talking to WordPress.
#[derive(Debug, Error)]
pub enum CmsError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status.
    #[error("WordPress returned HTTP {0}")]
    Status(u16),

    /// Rate limited by the CMS host.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// GraphQL query returned errors or no data.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A GraphQL error returned by WordPress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphQLError {
    pub message: String,
    /// Dotted path to the failing field, if reported.
    pub path: String,
}

impl GraphQLError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: String::new(),
        }
    }
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .map(|e| match (e.message.is_empty(), e.path.is_empty()) {
            (false, true) => e.message.clone(),
            (false, false) => format!("{} (path: {})", e.message, e.path),
            (true, false) => format!("path: {}", e.path),
            (true, true) => "(no details)".to_string(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn truncate(body: &str, max: usize) -> String {
    body.chars().take(max).collect()
}

// =============================================================================
// WordPressClient
// =============================================================================

/// Client for the WordPress GraphQL API.
///
/// Cheap to clone; clones share the HTTP connection pool and the cache.
#[derive(Clone)]
pub struct WordPressClient {
    inner: Arc<WordPressClientInner>,
}

struct WordPressClientInner {
    client: reqwest::Client,
    endpoint: String,
    auth_token: Option<SecretString>,
    cache: Cache<CacheKey, CacheValue>,
}

impl WordPressClient {
    /// Create a new WordPress client.
    #[must_use]
    pub fn new(config: &WordPressConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(WordPressClientInner {
                client: reqwest::Client::new(),
                endpoint: config.graphql_url.to_string(),
                auth_token: config.auth_token.clone(),
                cache,
            }),
        }
    }

    /// Execute a GraphQL document.
    async fn execute<V, D>(&self, query: &str, variables: V, authed: bool) -> Result<D, CmsError>
    where
        V: Serialize,
        D: DeserializeOwned,
    {
        let mut request = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .json(&GraphQLRequest { query, variables });

        if authed && let Some(token) = &self.inner.auth_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CmsError::RateLimited(retry_after));
        }

        let response_text = response.text().await?;

        if !status.is_success() {
            error!(
                status = %status,
                body = %truncate(&response_text, 500),
                "WordPress returned non-success status"
            );
            return Err(CmsError::Status(status.as_u16()));
        }

        let response: GraphQLResponse<D> = serde_json::from_str(&response_text).map_err(|e| {
            error!(
                error = %e,
                body = %truncate(&response_text, 500),
                "Failed to parse WordPress GraphQL response"
            );
            CmsError::Parse(e)
        })?;

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            debug!(errors = ?errors, "GraphQL errors in response");
            return Err(CmsError::GraphQL(
                errors
                    .into_iter()
                    .map(|e| GraphQLError {
                        message: e.message,
                        path: e
                            .path
                            .iter()
                            .map(|p| match p {
                                serde_json::Value::String(s) => s.clone(),
                                other => other.to_string(),
                            })
                            .collect::<Vec<_>>()
                            .join("."),
                    })
                    .collect(),
            ));
        }

        response.data.ok_or_else(|| {
            error!(
                body = %truncate(&response_text, 500),
                "WordPress GraphQL response has no data and no errors"
            );
            CmsError::GraphQL(vec![GraphQLError::new("No data in response")])
        })
    }

    // =========================================================================
    // Content
    // =========================================================================

    /// Fetch one page of blog posts, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(first = query.page_size, after = %query.cursor))]
    pub async fn fetch_posts(&self, query: &PageQuery) -> Result<ListPage<Post>, CmsError> {
        let search = query.search_filter().map(str::to_string);
        let cache_key = CacheKey::Posts {
            page_size: query.page_size,
            cursor: query.cursor.clone(),
            category: query.category_filter().map(str::to_string),
            tag: query.tag_filter().map(str::to_string),
        };

        if search.is_none()
            && let Some(CacheValue::Posts(page)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for posts");
            return Ok(page);
        }

        let variables = ListVariables {
            first: query.page_size,
            after: query.after().map(str::to_string),
            filter: PostWhere {
                category_name: query.category_filter().map(str::to_string),
                search: search.clone(),
                tag: query.tag_filter().map(str::to_string),
            },
        };

        let data: PostsData = self.execute(GET_POSTS, variables, false).await?;
        let page = convert_post_connection(data.posts);

        if search.is_none() {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Posts(page.clone()))
                .await;
        }

        Ok(page)
    }

    /// Fetch one page of portfolio projects.
    ///
    /// Projects carry categories but no tags, so the tag filter is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(first = query.page_size, after = %query.cursor))]
    pub async fn fetch_projects(&self, query: &PageQuery) -> Result<ListPage<Project>, CmsError> {
        let search = query.search_filter().map(str::to_string);
        let cache_key = CacheKey::Projects {
            page_size: query.page_size,
            cursor: query.cursor.clone(),
            category: query.category_filter().map(str::to_string),
        };

        if search.is_none()
            && let Some(CacheValue::Projects(page)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for projects");
            return Ok(page);
        }

        let variables = project_variables(query);
        let data: ProjectsData = self.execute(GET_PROJECTS, variables, false).await?;
        let page = convert_project_connection(data.projects);

        if search.is_none() {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Projects(page.clone()))
                .await;
        }

        Ok(page)
    }

    /// Blog posts as a list source.
    #[must_use]
    pub fn posts(&self) -> PostSource {
        PostSource(self.clone())
    }

    /// Portfolio projects as a list source.
    #[must_use]
    pub fn projects(&self) -> ProjectSource {
        ProjectSource(self.clone())
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Create a cash-on-delivery order for `items`.
    ///
    /// Never fails: transport and CMS errors are logged and turned into a
    /// rejected response carrying a message for the shopper.
    #[instrument(skip_all, fields(lines = items.len()))]
    pub async fn create_order(&self, form: &ContactForm, items: &[CartItem]) -> OrderResponse {
        if !self.has_auth_token() {
            warn!("Creating order without a WordPress auth token");
        }

        let address = CustomerAddress {
            first_name: form.name.clone(),
            address1: form.address.clone(),
            phone: form.phone.clone(),
            email: form.email.clone(),
            country: "VN",
        };
        let variables = CreateOrderVariables {
            input: CreateOrderInput {
                billing: address.clone(),
                shipping: address,
                line_items: items
                    .iter()
                    .map(OrderLine::from)
                    .map(|line| LineItemInput {
                        product_id: line.product_id.as_i64(),
                        quantity: line.quantity,
                    })
                    .collect(),
                customer_note: form.note.clone(),
                payment_method: "cod",
                payment_method_title: "Thanh toán khi nhận hàng",
                is_paid: false,
            },
        };

        let result: Result<CreateOrderData, CmsError> =
            self.execute(CREATE_ORDER, variables, true).await;

        match result {
            Ok(data) => match data.create_order.and_then(|p| p.order) {
                Some(order) => {
                    let order = convert_order(order);
                    debug!(order_number = %order.order_number, "Order created");
                    OrderResponse::created(order)
                }
                None => {
                    error!("createOrder returned no order");
                    OrderResponse::rejected(MSG_ORDER_FAILED)
                }
            },
            Err(CmsError::RateLimited(retry_after)) => {
                warn!(retry_after, "Order creation rate limited");
                OrderResponse::rejected(MSG_BUSY)
            }
            Err(e) => {
                error!(error = %e, "Order creation failed");
                OrderResponse::rejected(MSG_ORDER_FAILED)
            }
        }
    }

    fn has_auth_token(&self) -> bool {
        self.inner
            .auth_token
            .as_ref()
            .is_some_and(|t| !t.expose_secret().is_empty())
    }
}

impl OrderService for WordPressClient {
    fn create_order(
        &self,
        form: &ContactForm,
        items: &[CartItem],
    ) -> impl Future<Output = OrderResponse> + Send {
        Self::create_order(self, form, items)
    }
}

// =============================================================================
// List sources
// =============================================================================

/// Blog posts from WordPress.
#[derive(Clone)]
pub struct PostSource(WordPressClient);

impl PageSource for PostSource {
    type Item = Post;

    fn fetch_page(
        &self,
        query: PageQuery,
    ) -> impl Future<Output = Result<ListPage<Post>, CmsError>> + Send {
        let client = self.0.clone();
        async move { client.fetch_posts(&query).await }
    }
}

/// Portfolio projects from WordPress.
#[derive(Clone)]
pub struct ProjectSource(WordPressClient);

impl PageSource for ProjectSource {
    type Item = Project;

    fn fetch_page(
        &self,
        query: PageQuery,
    ) -> impl Future<Output = Result<ListPage<Project>, CmsError>> + Send {
        let client = self.0.clone();
        async move { client.fetch_projects(&query).await }
    }
}

/// Projects carry no tags in the CMS, so a tag filter is ignored.
fn project_variables(query: &PageQuery) -> ListVariables<ProjectWhere> {
    if let Some(tag) = query.tag_filter() {
        debug!(tag, "Ignoring tag filter for projects");
    }

    ListVariables {
        first: query.page_size,
        after: query.after().map(str::to_string),
        filter: ProjectWhere {
            search: query.search_filter().map(str::to_string),
            tax_query: query.category_filter().map(TaxQuery::project_category),
        },
    }
}
