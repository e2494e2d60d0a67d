//! Interface to the network transport that performs the actual I/O.
//!
//! The transport is external: connection setup, TLS, DNS and HTTP parsing
//! all live behind [`Transport`]. A `WebRequest` drives it and receives its
//! callbacks through [`TransportDelegate`].

use crate::base::neterror::NetError;
use crate::http::{AuthChallengeInfo, AuthCredentials};
use crate::urlrequest::iobuffer::IoBuffer;
use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use std::sync::Weak;
use url::Url;

/// Outcome of a single [`Transport::read`].
#[derive(Debug)]
pub enum ReadResult {
    /// The read finished synchronously. An empty buffer means end of body.
    Complete(IoBuffer),
    /// The transport kept the buffer and will hand it back through
    /// [`TransportDelegate::on_read_completed`].
    Pending,
    /// The read failed; the buffer was released.
    Failed(NetError),
}

/// Status of the transport's current operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TransportStatus {
    #[default]
    Success,
    IoPending,
    Canceled,
    Failed(NetError),
}

impl TransportStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, TransportStatus::Success | TransportStatus::IoPending)
    }

    pub fn is_io_pending(&self) -> bool {
        matches!(self, TransportStatus::IoPending)
    }

    /// The error to report for this status, if it is a failure.
    pub fn error(&self) -> Option<NetError> {
        match self {
            TransportStatus::Success | TransportStatus::IoPending => None,
            TransportStatus::Canceled => Some(NetError::Aborted),
            TransportStatus::Failed(e) => Some(e.clone()),
        }
    }
}

/// Whatever the transport currently knows about the response.
#[derive(Debug, Clone)]
pub struct ResponseInfo {
    /// Final URL after redirects, once known.
    pub url: Option<Url>,
    pub mime_type: String,
    pub charset: String,
    /// Declared body length, or -1 when unknown.
    pub expected_content_size: i64,
    pub status: Option<StatusCode>,
    pub headers: HeaderMap,
}

impl Default for ResponseInfo {
    fn default() -> Self {
        Self {
            url: None,
            mime_type: String::new(),
            charset: String::new(),
            expected_content_size: -1,
            status: None,
            headers: HeaderMap::new(),
        }
    }
}

/// A single network request as offered by the transport.
///
/// Implementations must not invoke the delegate synchronously from inside
/// any method of this trait; callbacks arrive later, on the transport
/// thread, one at a time.
pub trait Transport: Send {
    /// Begin the request. Callbacks go to `delegate` while it is alive.
    fn start(&mut self, delegate: Weak<dyn TransportDelegate>, private_browsing: bool);

    /// Abort the request. No callbacks should follow.
    ///
    /// Called with the request locked, so it must not wait for a callback
    /// already running on the transport thread. The transport itself is
    /// dropped after the lock is released, possibly on the transport thread.
    fn cancel(&mut self);

    /// Read the next body chunk into `buffer`.
    fn read(&mut self, buffer: IoBuffer) -> ReadResult;

    fn set_extra_headers(&mut self, headers: HeaderMap);

    fn set_referrer(&mut self, referrer: String);

    fn set_method(&mut self, method: Method);

    fn append_bytes_to_upload(&mut self, chunk: Bytes);

    /// Answer an auth challenge; the request is reissued.
    fn set_auth(&mut self, credentials: AuthCredentials);

    /// Decline an auth challenge; the request is reissued without auth.
    fn cancel_auth(&mut self);

    fn response_info(&self) -> ResponseInfo;

    fn status(&self) -> TransportStatus;
}

/// Callbacks from the transport, invoked on the transport thread.
pub trait TransportDelegate: Send + Sync {
    /// A server redirect to `new_url` will be followed unless the request
    /// is cancelled. An `Err` means the redirect itself was rejected.
    fn on_received_redirect(&self, new_url: Result<Url, NetError>);

    fn on_auth_required(&self, challenge: AuthChallengeInfo);

    /// The final response started arriving, or the request failed first.
    fn on_response_started(&self, result: Result<(), NetError>);

    /// A read that returned [`ReadResult::Pending`] finished.
    fn on_read_completed(&self, result: Result<IoBuffer, NetError>);
}
