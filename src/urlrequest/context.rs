//! WebRequest Context - shared configuration for loads.
//!
//! Based on Chromium's net::URLRequestContext: one context is shared by
//! every request of a browsing profile and bundles its settings together
//! with the injected asset store.

use crate::urlrequest::assets::{AssetStore, NoAssets};
use crate::urlrequest::iobuffer::DEFAULT_READ_BUFFER_SIZE;
use serde::Deserialize;
use std::sync::Arc;

/// Configuration options for WebRequestContext.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WebRequestContextConfig {
    /// User-Agent string used when a request does not carry its own.
    pub user_agent: String,

    /// Accept-Language header value.
    pub accept_language: Option<String>,

    /// Capacity of each body read buffer.
    pub read_buffer_size: usize,

    /// Asset backing the `browser:incognito` page.
    pub incognito_page_asset: String,

    /// MIME type for input streams whose type cannot be derived.
    pub fallback_mime_type: String,
}

impl Default for WebRequestContextConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Linux; U; Android 2.3; en-us) AppleWebKit/533.1 \
                (KHTML, like Gecko) Version/4.0 Mobile Safari/533.1"
                .to_string(),
            accept_language: Some("en-US,en;q=0.9".to_string()),
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            incognito_page_asset: "webkit/incognito_mode_start_page.html".to_string(),
            fallback_mime_type: "text/html".to_string(),
        }
    }
}

impl WebRequestContextConfig {
    /// Load from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut config: Self = serde_json::from_str(json)?;
        if config.read_buffer_size == 0 {
            tracing::warn!("read_buffer_size of 0 replaced with the default");
            config.read_buffer_size = DEFAULT_READ_BUFFER_SIZE;
        }
        Ok(config)
    }
}

/// Shared settings and services for WebRequests.
pub struct WebRequestContext {
    /// Bundled static content.
    asset_store: Arc<dyn AssetStore>,

    /// Configuration options.
    config: WebRequestContextConfig,
}

impl WebRequestContext {
    /// Create a new WebRequestContext with default configuration.
    pub fn new() -> Self {
        Self::with_config(WebRequestContextConfig::default())
    }

    /// Create a new WebRequestContext with custom configuration.
    pub fn with_config(config: WebRequestContextConfig) -> Self {
        Self {
            asset_store: Arc::new(NoAssets),
            config,
        }
    }

    /// Replace the asset store.
    pub fn with_asset_store(mut self, store: Arc<dyn AssetStore>) -> Self {
        self.asset_store = store;
        self
    }

    /// Get the asset store.
    pub fn asset_store(&self) -> &Arc<dyn AssetStore> {
        &self.asset_store
    }

    pub fn config(&self) -> &WebRequestContextConfig {
        &self.config
    }

    /// Get the user agent string.
    pub fn user_agent(&self) -> &str {
        &self.config.user_agent
    }

    /// Get the accept language header.
    pub fn accept_language(&self) -> Option<&str> {
        self.config.accept_language.as_deref()
    }

    pub fn read_buffer_size(&self) -> usize {
        self.config.read_buffer_size.max(1)
    }
}

impl Default for WebRequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WebRequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebRequestContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
