//! Response metadata handed to the loader client.

use crate::base::neterror::NetError;
use crate::transport::ResponseInfo;
use http::HeaderMap;

/// Status reported for content that never touched the network.
pub const SYNTHETIC_STATUS: u16 = 200;

/// Immutable response descriptor.
///
/// Built once per event (response, redirect or failure) and moved into the
/// notification that carries it; the client owns it from then on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebResponse {
    url: String,
    mime_type: String,
    expected_size: i64,
    charset: String,
    status: u16,
    headers: HeaderMap,
    error: Option<NetError>,
}

impl WebResponse {
    /// Create a descriptor for locally produced content.
    pub fn new(
        url: impl Into<String>,
        mime_type: impl Into<String>,
        expected_size: i64,
        charset: impl Into<String>,
        status: u16,
    ) -> Self {
        Self {
            url: url.into(),
            mime_type: mime_type.into(),
            expected_size,
            charset: charset.into(),
            status,
            headers: HeaderMap::new(),
            error: None,
        }
    }

    /// Descriptor carrying nothing but the URL, used when there is no
    /// content to describe at all.
    pub fn empty(url: impl Into<String>) -> Self {
        Self::new(url, "", 0, "", 0)
    }

    /// Build from whatever the transport knows about the current response.
    /// `fallback_url` is used when the transport has not resolved one yet.
    pub fn from_info(info: ResponseInfo, fallback_url: &str, error: Option<NetError>) -> Self {
        Self {
            url: info
                .url
                .map(String::from)
                .unwrap_or_else(|| fallback_url.to_string()),
            mime_type: info.mime_type,
            expected_size: info.expected_content_size,
            charset: info.charset,
            status: info.status.map(|s| s.as_u16()).unwrap_or(0),
            headers: info.headers,
            error,
        }
    }

    /// Replace the URL, keeping everything else. Used for redirects.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Attach the error that ended the load.
    pub fn with_error(mut self, error: NetError) -> Self {
        self.error = Some(error);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Declared body length, or -1 when unknown.
    pub fn expected_size(&self) -> i64 {
        self.expected_size
    }

    pub fn charset(&self) -> &str {
        &self.charset
    }

    /// HTTP status code; 0 when no response was received.
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn error(&self) -> Option<&NetError> {
        self.error.as_ref()
    }

    /// Whether this descriptor carries no response metadata.
    pub fn is_empty(&self) -> bool {
        self.mime_type.is_empty() && self.status == 0 && self.headers.is_empty()
    }
}
