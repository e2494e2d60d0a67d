//! Non-network content sources.
//!
//! Each source runs to completion inside `WebRequest::start`, reports
//! through the same notifications as the network path, and ends in exactly
//! one terminal notification.

use crate::base::loadstate::LoadState;
use crate::base::neterror::NetError;
use crate::http::response::SYNTHETIC_STATUS;
use crate::http::{mimeutil, DataUrl, WebResponse};
use crate::urlrequest::client::WebUrlLoaderClient;
use crate::urlrequest::context::WebRequestContext;
use crate::urlrequest::iobuffer::IoBuffer;
use std::fmt;
use std::io::{self, Read};
use url::Url;

const INCOGNITO_PAGE: &str = "browser:incognito";

/// Where the body of a non-network load comes from.
pub enum ContentSource {
    /// A byte stream supplied by the embedder; `None` if it could not be
    /// opened.
    InputStream(Option<Box<dyn Read + Send>>),
    /// A self-contained `data:` URL.
    DataUrl,
    /// A page synthesized for a reserved `browser:` URL.
    BrowserPage,
}

/// The request-side hooks a source reports through.
pub(crate) trait SourceSink {
    fn set_state(&mut self, state: LoadState);

    fn post<F>(&mut self, notify: F)
    where
        F: FnOnce(&dyn WebUrlLoaderClient) + Send + 'static;

    /// Terminal success.
    fn complete(&mut self);

    /// Terminal failure carrying `response`.
    fn fail(&mut self, response: WebResponse);
}

impl ContentSource {
    /// The source that serves `url` without the network, if any.
    pub fn for_url(url: &Url) -> Option<Self> {
        match url.scheme() {
            "data" => Some(ContentSource::DataUrl),
            "browser" => Some(ContentSource::BrowserPage),
            _ => None,
        }
    }

    pub(crate) fn run(self, url: &Url, context: &WebRequestContext, sink: &mut impl SourceSink) {
        match self {
            ContentSource::InputStream(stream) => load_input_stream(stream, url, context, sink),
            ContentSource::DataUrl => load_data_url(url.as_str(), url.as_str(), sink),
            ContentSource::BrowserPage => load_browser_page(url, context, sink),
        }
    }
}

impl fmt::Debug for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentSource::InputStream(stream) => f
                .debug_tuple("InputStream")
                .field(&stream.is_some())
                .finish(),
            ContentSource::DataUrl => f.write_str("DataUrl"),
            ContentSource::BrowserPage => f.write_str("BrowserPage"),
        }
    }
}

/// MIME type for a streamed URL: an explicit `?type/subtype` suffix wins,
/// then the file extension, then `fallback`.
pub fn stream_mime_type(url: &Url, fallback: &str) -> String {
    if let Some(suffix) = url.query().and_then(|q| q.rsplit('?').next()) {
        if !suffix.is_empty() {
            return suffix.to_string();
        }
    }
    mimeutil::mime_type_from_path(url.path())
        .unwrap_or(fallback)
        .to_string()
}

fn load_input_stream(
    stream: Option<Box<dyn Read + Send>>,
    url: &Url,
    context: &WebRequestContext,
    sink: &mut impl SourceSink,
) {
    let Some(mut stream) = stream else {
        tracing::debug!(url = %url, "no input stream to load from");
        sink.fail(WebResponse::empty(url.as_str()));
        return;
    };

    let mime_type = stream_mime_type(url, &context.config().fallback_mime_type);
    sink.set_state(LoadState::Response);
    let response = WebResponse::new(url.as_str(), mime_type.clone(), -1, "", SYNTHETIC_STATUS);
    sink.post(move |client| client.did_receive_response(response));

    loop {
        let mut buffer = IoBuffer::new(context.read_buffer_size());
        match buffer.fill_from_reader(stream.as_mut()) {
            Ok(0) => break,
            Ok(n) => {
                tracing::trace!(url = %url, bytes = n, "input stream chunk");
                sink.set_state(LoadState::GotData);
                let data = buffer.freeze();
                sink.post(move |client| client.did_receive_stream_data(data));
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "input stream read failed");
                let response =
                    WebResponse::new(url.as_str(), mime_type, -1, "", SYNTHETIC_STATUS)
                        .with_error(io_error_to_net(&e));
                sink.fail(response);
                return;
            }
        }
    }
    sink.complete();
}

fn io_error_to_net(e: &io::Error) -> NetError {
    match e.kind() {
        io::ErrorKind::NotFound => NetError::FileNotFound,
        io::ErrorKind::PermissionDenied => NetError::AccessDenied,
        io::ErrorKind::TimedOut => NetError::TimedOut,
        _ => NetError::Failed,
    }
}

/// Decode `payload` and deliver it, reporting `display_url` as the
/// response URL.
fn load_data_url(payload: &str, display_url: &str, sink: &mut impl SourceSink) {
    let (mime_type, charset, data) = match DataUrl::parse(payload) {
        Ok(parsed) => parsed.into_parts(),
        Err(e) => {
            tracing::debug!(url = display_url, error = %e, "malformed data url");
            sink.fail(WebResponse::empty(display_url).with_error(e));
            return;
        }
    };

    sink.set_state(LoadState::Response);
    let response = WebResponse::new(
        display_url,
        mime_type,
        data.len() as i64,
        charset,
        SYNTHETIC_STATUS,
    );
    sink.post(move |client| client.did_receive_response(response));

    if !data.is_empty() {
        sink.set_state(LoadState::GotData);
        sink.post(move |client| client.did_receive_data_url(data));
    }
    sink.complete();
}

fn load_browser_page(url: &Url, context: &WebRequestContext, sink: &mut impl SourceSink) {
    let asset = if url.as_str() == INCOGNITO_PAGE {
        let name = &context.config().incognito_page_asset;
        let asset = context.asset_store().open(name);
        if asset.is_none() {
            tracing::debug!(asset = %name, "incognito page asset missing; serving empty page");
        }
        asset
    } else {
        None
    };

    let payload = DataUrl::encode("text/html", "utf-8", asset.as_deref().unwrap_or_default());
    load_data_url(&payload, url.as_str(), sink);
}
