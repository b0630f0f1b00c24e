//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::wordpress::WordPressClient;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    wordpress: WordPressClient,
}

impl AppState {
    /// Create the state, building the WordPress client from `config`.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let wordpress = WordPressClient::new(&config.wordpress);
        Self {
            inner: Arc::new(AppStateInner { config, wordpress }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// The WordPress GraphQL client.
    #[must_use]
    pub fn wordpress(&self) -> &WordPressClient {
        &self.inner.wordpress
    }
}
