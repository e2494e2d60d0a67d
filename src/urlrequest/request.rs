use crate::base::neterror::NetError;
use crate::http::UploadData;
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method};
use url::Url;

/// Everything the page asked for when it issued a load.
///
/// Once handed to a `WebRequest` the method, headers and referrer are
/// applied to the transport and can no longer change.
#[derive(Debug, Clone)]
pub struct WebResourceRequest {
    url: Url,
    method: Method,
    headers: HeaderMap,
    referrer: Option<String>,
    user_agent: Option<String>,
    upload: UploadData,
}

impl WebResourceRequest {
    pub fn new(url_str: &str) -> Result<Self, NetError> {
        let url = Url::parse(url_str).map_err(|_| NetError::InvalidUrl)?;
        Ok(Self::from_url(url))
    }

    pub fn from_url(url: Url) -> Self {
        Self {
            url,
            method: Method::GET,
            headers: HeaderMap::new(),
            referrer: None,
            user_agent: None,
            upload: UploadData::default(),
        }
    }

    /// Create a POST request.
    pub fn post(url_str: &str) -> Result<Self, NetError> {
        let mut req = Self::new(url_str)?;
        req.set_method(Method::POST);
        Ok(req)
    }

    pub fn set_method(&mut self, method: Method) {
        self.method = method;
    }

    /// Add a header to the request.
    /// Returns an error if the header name or value is invalid.
    pub fn add_header(&mut self, key: &str, value: &str) -> Result<(), NetError> {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|_| NetError::InvalidArgument)?;
        let value = HeaderValue::from_str(value).map_err(|_| NetError::InvalidArgument)?;
        self.headers.append(name, value);
        Ok(())
    }

    pub fn set_referrer(&mut self, referrer: impl Into<String>) {
        self.referrer = Some(referrer.into());
    }

    pub fn set_user_agent(&mut self, user_agent: impl Into<String>) {
        self.user_agent = Some(user_agent.into());
    }

    /// Append a chunk to the upload body.
    pub fn append_upload(&mut self, chunk: impl Into<Bytes>) {
        self.upload.append(chunk);
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn referrer(&self) -> Option<&str> {
        self.referrer.as_deref()
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    pub fn upload(&self) -> &UploadData {
        &self.upload
    }

    pub(crate) fn take_upload(&mut self) -> UploadData {
        std::mem::take(&mut self.upload)
    }

    pub(crate) fn take_headers(&mut self) -> HeaderMap {
        std::mem::take(&mut self.headers)
    }
}
