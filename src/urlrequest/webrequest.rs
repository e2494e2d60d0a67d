//! The per-load state machine.
//!
//! A `WebRequest` sits between a [`Transport`] calling back on the
//! transport thread and a [`WebUrlLoaderClient`] living on the owner thread.
//! Every event it sees is turned into one notification posted to the owner
//! thread; every load ends in exactly one `did_finish_loading` or
//! `did_fail`.

use crate::base::loadstate::LoadState;
use crate::base::neterror::NetError;
use crate::http::{AuthChallengeInfo, AuthCredentials, WebResponse};
use crate::transport::{ReadResult, Transport, TransportDelegate};
use crate::urlrequest::client::{LoaderClientHandle, WebUrlLoaderClient};
use crate::urlrequest::context::WebRequestContext;
use crate::urlrequest::iobuffer::IoBuffer;
use crate::urlrequest::request::WebResourceRequest;
use crate::urlrequest::source::{ContentSource, SourceSink};
use bytes::Bytes;
use http::header::{HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use std::fmt;
use std::io::Read;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use url::Url;

/// Contract check: logs and panics when `$cond` does not hold.
macro_rules! check_state {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            tracing::error!($($arg)+);
            panic!($($arg)+);
        }
    };
}

/// Whether the request's single read buffer is lent to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ReadSlot {
    #[default]
    Empty,
    Lent,
}

enum Outcome {
    Success,
    Failure(WebResponse),
}

struct Inner {
    url: Url,
    state: LoadState,
    transport: Option<Box<dyn Transport>>,
    /// Transport released by `finish`, dropped once the lock is gone.
    retired: Option<Box<dyn Transport>>,
    source: Option<ContentSource>,
    client: Option<LoaderClientHandle>,
    read_slot: ReadSlot,
    buffer_size: usize,
}

/// One resource load.
///
/// Always handled through an `Arc`: the owner thread keeps one to call
/// [`start`](Self::start) and [`cancel`](Self::cancel), and the transport
/// holds a `Weak` for its callbacks.
pub struct WebRequest {
    url: Url,
    user_agent: String,
    context: Arc<WebRequestContext>,
    this: Weak<WebRequest>,
    inner: Mutex<Inner>,
}

impl WebRequest {
    /// Create a request served by `transport`, or by a built-in source if
    /// the URL scheme has one (`data:`, `browser:`).
    pub fn new(
        context: Arc<WebRequestContext>,
        client: LoaderClientHandle,
        mut request: WebResourceRequest,
        mut transport: Box<dyn Transport>,
    ) -> Arc<Self> {
        let user_agent = Self::user_agent_for(&context, &request);

        let mut headers = request.take_headers();
        if !headers.contains_key(USER_AGENT) {
            if let Ok(value) = HeaderValue::from_str(&user_agent) {
                headers.insert(USER_AGENT, value);
            }
        }
        if !headers.contains_key(ACCEPT_LANGUAGE) {
            if let Some(value) = context
                .accept_language()
                .and_then(|lang| HeaderValue::from_str(lang).ok())
            {
                headers.insert(ACCEPT_LANGUAGE, value);
            }
        }
        transport.set_extra_headers(headers);
        if let Some(referrer) = request.referrer() {
            transport.set_referrer(referrer.to_string());
        }
        transport.set_method(request.method().clone());
        for chunk in request.take_upload().into_chunks() {
            transport.append_bytes_to_upload(chunk);
        }

        Self::build(context, client, &request, user_agent, Some(transport), None)
    }

    /// Create a request whose body is pulled from an embedder stream.
    /// A `None` stream makes the load fail as soon as it starts.
    pub fn with_input_stream(
        context: Arc<WebRequestContext>,
        client: LoaderClientHandle,
        request: WebResourceRequest,
        stream: Option<Box<dyn Read + Send>>,
    ) -> Arc<Self> {
        let user_agent = Self::user_agent_for(&context, &request);
        let source = ContentSource::InputStream(stream);
        Self::build(context, client, &request, user_agent, None, Some(source))
    }

    fn user_agent_for(context: &WebRequestContext, request: &WebResourceRequest) -> String {
        request
            .user_agent()
            .unwrap_or_else(|| context.user_agent())
            .to_string()
    }

    fn build(
        context: Arc<WebRequestContext>,
        client: LoaderClientHandle,
        request: &WebResourceRequest,
        user_agent: String,
        transport: Option<Box<dyn Transport>>,
        source: Option<ContentSource>,
    ) -> Arc<Self> {
        let url = request.url().clone();
        let inner = Inner {
            url: url.clone(),
            state: LoadState::Created,
            transport,
            retired: None,
            source,
            client: Some(client),
            read_slot: ReadSlot::Empty,
            buffer_size: context.read_buffer_size(),
        };
        Arc::new_cyclic(|this| WebRequest {
            url,
            user_agent,
            context,
            this: this.clone(),
            inner: Mutex::new(inner),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Release the lock, then drop any transport `finish` let go of, so a
    /// transport destructor never runs with the request locked.
    fn unlock(mut inner: MutexGuard<'_, Inner>) {
        let retired = inner.retired.take();
        drop(inner);
        drop(retired);
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn load_state(&self) -> LoadState {
        self.lock().state
    }

    /// Add a chunk to the upload body. Only valid before `start`.
    pub fn append_bytes_to_upload(&self, chunk: Bytes) {
        let mut inner = self.lock();
        check_state!(
            inner.state == LoadState::Created,
            "append_bytes_to_upload called on a WebRequest not in Created state ({})",
            self.url
        );
        match inner.transport.as_mut() {
            Some(transport) => transport.append_bytes_to_upload(chunk),
            None => tracing::debug!(url = %self.url, "upload ignored by non-network request"),
        }
    }

    /// Begin the load. Content sources run to completion before this
    /// returns; network loads continue on the transport thread.
    pub fn start(&self, private_browsing: bool) {
        let mut inner = self.lock();
        check_state!(
            inner.state == LoadState::Created,
            "start called on a WebRequest not in Created state ({})",
            self.url
        );
        inner.state = LoadState::Started;
        tracing::debug!(url = %self.url, private_browsing, "starting request");

        let source = inner
            .source
            .take()
            .or_else(|| ContentSource::for_url(&self.url));
        if let Some(source) = source {
            source.run(&self.url, &self.context, &mut *inner);
        } else {
            let delegate: Weak<dyn TransportDelegate> = self.this.clone();
            match inner.transport.as_mut() {
                Some(transport) => transport.start(delegate, private_browsing),
                None => inner.fail_with_error(NetError::Failed),
            }
        }
        Self::unlock(inner);
    }

    /// Abort the load.
    ///
    /// Safe to race with the transport: if the load already finished on the
    /// transport thread this does nothing, so the client never sees a second
    /// terminal notification.
    pub fn cancel(&self) {
        let mut inner = self.lock();
        check_state!(
            inner.state >= LoadState::Started,
            "cancel called on a not started WebRequest ({})",
            self.url
        );
        if !inner.state.is_active() {
            tracing::debug!(url = %self.url, "cancel after finish ignored");
            return;
        }

        inner.state = LoadState::Cancelled;
        tracing::debug!(url = %self.url, "cancelling request");
        if let Some(transport) = inner.transport.as_mut() {
            transport.cancel();
        }
        inner.finish(Outcome::Success);
        Self::unlock(inner);
    }

    /// Answer an auth challenge. The transport reissues the request.
    pub fn set_auth(&self, credentials: AuthCredentials) {
        let mut inner = self.lock();
        check_state!(
            inner.state == LoadState::Started,
            "set_auth called on a WebRequest not in Started state ({:?})",
            inner.state
        );
        if let Some(transport) = inner.transport.as_mut() {
            transport.set_auth(credentials);
        }
    }

    /// Decline an auth challenge. The transport reissues the request.
    pub fn cancel_auth(&self) {
        let mut inner = self.lock();
        check_state!(
            inner.state == LoadState::Started,
            "cancel_auth called on a WebRequest not in Started state ({:?})",
            inner.state
        );
        if let Some(transport) = inner.transport.as_mut() {
            transport.cancel_auth();
        }
    }

    /// Pull body chunks until the transport runs dry, blocks, or fails.
    fn start_reading(inner: &mut Inner) {
        check_state!(
            inner.state.is_reading(),
            "start_reading in state other than Response and GotData ({:?})",
            inner.state
        );

        // Keep reading in this turn while data is available synchronously.
        loop {
            match inner.read() {
                ReadResult::Complete(buffer) if buffer.is_empty() => {
                    inner.finish(Outcome::Success);
                    break;
                }
                ReadResult::Complete(buffer) => inner.forward(buffer),
                ReadResult::Pending => break,
                ReadResult::Failed(e) => {
                    inner.fail_with_error(e);
                    break;
                }
            }
        }
    }
}

impl Inner {
    /// Issue one read with a fresh buffer.
    fn read(&mut self) -> ReadResult {
        check_state!(
            self.state.is_reading(),
            "read in state other than Response and GotData ({:?})",
            self.state
        );
        check_state!(
            self.read_slot == ReadSlot::Empty,
            "read called while a buffer is outstanding ({})",
            self.url
        );
        let Some(transport) = self.transport.as_mut() else {
            return ReadResult::Failed(NetError::Failed);
        };

        self.read_slot = ReadSlot::Lent;
        let result = match transport.read(IoBuffer::new(self.buffer_size)) {
            ReadResult::Failed(e) if e.is_io_pending() => ReadResult::Pending,
            other => other,
        };
        if !matches!(result, ReadResult::Pending) {
            self.read_slot = ReadSlot::Empty;
        }
        result
    }

    /// Hand a filled buffer to the client.
    fn forward(&mut self, buffer: IoBuffer) {
        tracing::trace!(url = %self.url, bytes = buffer.len(), "forwarding chunk");
        self.state = LoadState::GotData;
        self.notify(move |client| client.did_receive_data(buffer));
    }

    fn notify<F>(&self, notify: F)
    where
        F: FnOnce(&dyn WebUrlLoaderClient) + Send + 'static,
    {
        match &self.client {
            Some(client) => client.post(notify),
            None => tracing::debug!(url = %self.url, "notification after finish dropped"),
        }
    }

    fn response_from_transport(&self, error: Option<NetError>) -> WebResponse {
        let info = self
            .transport
            .as_ref()
            .map(|t| t.response_info())
            .unwrap_or_default();
        WebResponse::from_info(info, self.url.as_str(), error)
    }

    fn fail_with_error(&mut self, error: NetError) {
        let response = self.response_from_transport(Some(error));
        self.finish(Outcome::Failure(response));
    }

    /// Terminal transition; the only place resources are released. The
    /// transport is parked in `retired` until `WebRequest::unlock`.
    fn finish(&mut self, outcome: Outcome) {
        check_state!(
            self.state < LoadState::Finished,
            "finish called on an already finished WebRequest ({})",
            self.url
        );
        self.state = LoadState::Finished;

        match outcome {
            Outcome::Success => {
                tracing::debug!(url = %self.url, "request finished");
                self.notify(|client| client.did_finish_loading());
            }
            Outcome::Failure(response) => {
                tracing::debug!(url = %self.url, error = ?response.error(), "request failed");
                self.notify(move |client| client.did_fail(response));
            }
        }

        self.read_slot = ReadSlot::Empty;
        self.retired = self.transport.take();
        self.source = None;
        self.client = None;
    }

    /// Whether a transport callback arrived after the load already ended,
    /// which happens when `cancel` wins a race with the transport thread.
    fn is_stale(&self, callback: &str) -> bool {
        if self.state >= LoadState::Finished {
            tracing::debug!(url = %self.url, callback, "ignoring transport callback after finish");
            return true;
        }
        false
    }
}

impl SourceSink for Inner {
    fn set_state(&mut self, state: LoadState) {
        self.state = state;
    }

    fn post<F>(&mut self, notify: F)
    where
        F: FnOnce(&dyn WebUrlLoaderClient) + Send + 'static,
    {
        self.notify(notify);
    }

    fn complete(&mut self) {
        self.finish(Outcome::Success);
    }

    fn fail(&mut self, response: WebResponse) {
        self.finish(Outcome::Failure(response));
    }
}

impl TransportDelegate for WebRequest {
    fn on_received_redirect(&self, new_url: Result<Url, NetError>) {
        let mut inner = self.lock();
        if inner.is_stale("on_received_redirect") {
            return;
        }
        check_state!(
            inner.state < LoadState::Response,
            "redirect after receiving response ({})",
            self.url
        );

        match new_url {
            Ok(new_url) => {
                tracing::debug!(url = %self.url, target = %new_url, "following redirect");
                let response = inner.response_from_transport(None).with_url(new_url.as_str());
                inner.notify(move |client| client.will_send_request(response));
            }
            Err(e) => inner.fail_with_error(e),
        }
        Self::unlock(inner);
    }

    fn on_auth_required(&self, challenge: AuthChallengeInfo) {
        let inner = self.lock();
        if inner.is_stale("on_auth_required") {
            return;
        }
        check_state!(
            inner.state == LoadState::Started,
            "on_auth_required called on a WebRequest not in Started state ({:?})",
            inner.state
        );
        inner.notify(move |client| client.auth_required(challenge));
    }

    fn on_response_started(&self, result: Result<(), NetError>) {
        let mut inner = self.lock();
        if inner.is_stale("on_response_started") {
            return;
        }
        check_state!(
            inner.state == LoadState::Started,
            "got response after receiving response ({:?})",
            inner.state
        );
        inner.state = LoadState::Response;

        let status_error = inner
            .transport
            .as_ref()
            .and_then(|t| t.status().error());
        match result.and_then(|()| status_error.map_or(Ok(()), Err)) {
            Ok(()) => {
                let response = inner.response_from_transport(None);
                tracing::debug!(url = %self.url, status = response.status(), "response started");
                inner.notify(move |client| client.did_receive_response(response));
                Self::start_reading(&mut inner);
            }
            Err(e) => inner.fail_with_error(e),
        }
        Self::unlock(inner);
    }

    fn on_read_completed(&self, result: Result<IoBuffer, NetError>) {
        let mut inner = self.lock();
        if inner.is_stale("on_read_completed") {
            return;
        }
        check_state!(
            inner.state.is_reading(),
            "on_read_completed in state other than Response and GotData ({:?})",
            inner.state
        );
        check_state!(
            inner.read_slot == ReadSlot::Lent,
            "on_read_completed without an outstanding read ({})",
            self.url
        );
        inner.read_slot = ReadSlot::Empty;

        match result {
            Ok(buffer) if buffer.is_empty() => inner.finish(Outcome::Success),
            Ok(buffer) => {
                inner.forward(buffer);
                Self::start_reading(&mut inner);
            }
            Err(e) => inner.fail_with_error(e),
        }
        Self::unlock(inner);
    }
}

impl Drop for WebRequest {
    fn drop(&mut self) {
        let inner = self.inner.get_mut().unwrap_or_else(PoisonError::into_inner);
        if !std::thread::panicking() {
            check_state!(
                inner.state == LoadState::Finished,
                "WebRequest dropped in state {:?} ({})",
                inner.state,
                self.url
            );
        }
        inner.state = LoadState::Deleted;
    }
}

impl fmt::Debug for WebRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebRequest")
            .field("url", &self.url.as_str())
            .field("state", &self.load_state())
            .finish_non_exhaustive()
    }
}
