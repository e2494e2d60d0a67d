//! Shared fixtures: a client that records what it is told and a transport
//! that plays back a script of reads.

#![allow(dead_code)]

use bytes::Bytes;
use http::{HeaderMap, Method};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Weak};
use std::thread::ThreadId;
use url::Url;
use webrequest::base::neterror::NetError;
use webrequest::http::{AuthChallengeInfo, AuthCredentials, WebResponse};
use webrequest::transport::{
    ReadResult, ResponseInfo, Transport, TransportDelegate, TransportStatus,
};
use webrequest::urlrequest::{
    IoBuffer, LoaderClientHandle, MainThread, MainThreadQueue, WebRequest, WebRequestContext,
    WebResourceRequest, WebUrlLoaderClient,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Response {
        url: String,
        mime: String,
        charset: String,
        status: u16,
        expected: i64,
    },
    WillSendRequest(String),
    AuthRequired(String),
    Data(Vec<u8>),
    StreamData(Vec<u8>),
    DataUrl(Vec<u8>),
    Fail {
        url: String,
        status: u16,
        error: Option<NetError>,
        empty: bool,
    },
    Finish,
}

impl Event {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Event::Fail { .. } | Event::Finish)
    }
}

#[derive(Default)]
pub struct RecordingClient {
    events: Mutex<Vec<Event>>,
    threads: Mutex<Vec<ThreadId>>,
}

impl RecordingClient {
    fn record(&self, event: Event) {
        self.threads
            .lock()
            .unwrap()
            .push(std::thread::current().id());
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn terminal_count(&self) -> usize {
        self.events().iter().filter(|e| e.is_terminal()).count()
    }

    pub fn threads(&self) -> Vec<ThreadId> {
        self.threads.lock().unwrap().clone()
    }
}

impl WebUrlLoaderClient for RecordingClient {
    fn did_receive_response(&self, response: WebResponse) {
        self.record(Event::Response {
            url: response.url().to_string(),
            mime: response.mime_type().to_string(),
            charset: response.charset().to_string(),
            status: response.status(),
            expected: response.expected_size(),
        });
    }

    fn will_send_request(&self, response: WebResponse) {
        self.record(Event::WillSendRequest(response.url().to_string()));
    }

    fn auth_required(&self, challenge: AuthChallengeInfo) {
        self.record(Event::AuthRequired(challenge.realm));
    }

    fn did_receive_data(&self, buffer: IoBuffer) {
        self.record(Event::Data(buffer.data().to_vec()));
    }

    fn did_receive_stream_data(&self, data: Bytes) {
        self.record(Event::StreamData(data.to_vec()));
    }

    fn did_receive_data_url(&self, data: Bytes) {
        self.record(Event::DataUrl(data.to_vec()));
    }

    fn did_fail(&self, response: WebResponse) {
        self.record(Event::Fail {
            url: response.url().to_string(),
            status: response.status(),
            error: response.error().cloned(),
            empty: response.is_empty(),
        });
    }

    fn did_finish_loading(&self) {
        self.record(Event::Finish);
    }
}

/// One scripted answer to `Transport::read`.
#[derive(Debug, Clone)]
pub enum Step {
    Chunk(&'static [u8]),
    Pending,
    Eof,
    Fail(NetError),
}

#[derive(Default)]
pub struct TransportLog {
    pub started: bool,
    pub private_browsing: bool,
    pub cancelled: bool,
    pub headers: HeaderMap,
    pub referrer: Option<String>,
    pub method: Option<Method>,
    pub upload: Vec<Bytes>,
    pub auth: Option<(String, String)>,
    pub auth_cancelled: bool,
    pub reads: usize,
    pub buffer_capacity: usize,
    /// Buffer kept by a pending read.
    pub held: Option<IoBuffer>,
    pub delegate: Option<Weak<dyn TransportDelegate>>,
}

pub struct ScriptedTransport {
    steps: VecDeque<Step>,
    info: ResponseInfo,
    status: TransportStatus,
    log: Arc<Mutex<TransportLog>>,
}

/// Test-side view of a transport owned by a request.
#[derive(Clone)]
pub struct TransportHandle {
    log: Arc<Mutex<TransportLog>>,
}

impl ScriptedTransport {
    pub fn new(steps: Vec<Step>) -> (Box<dyn Transport>, TransportHandle) {
        Self::with_info(steps, ok_info("https://example.com/"), TransportStatus::Success)
    }

    pub fn with_info(
        steps: Vec<Step>,
        info: ResponseInfo,
        status: TransportStatus,
    ) -> (Box<dyn Transport>, TransportHandle) {
        let log = Arc::new(Mutex::new(TransportLog::default()));
        let transport = ScriptedTransport {
            steps: steps.into(),
            info,
            status,
            log: log.clone(),
        };
        (Box::new(transport), TransportHandle { log })
    }
}

impl Transport for ScriptedTransport {
    fn start(&mut self, delegate: Weak<dyn TransportDelegate>, private_browsing: bool) {
        let mut log = self.log.lock().unwrap();
        log.started = true;
        log.private_browsing = private_browsing;
        log.delegate = Some(delegate);
    }

    fn cancel(&mut self) {
        self.log.lock().unwrap().cancelled = true;
    }

    fn read(&mut self, mut buffer: IoBuffer) -> ReadResult {
        let mut log = self.log.lock().unwrap();
        assert!(log.held.is_none(), "second read issued while one is pending");
        log.reads += 1;
        log.buffer_capacity = buffer.capacity();
        match self.steps.pop_front().unwrap_or(Step::Eof) {
            Step::Chunk(data) => {
                buffer.fill_from(data);
                ReadResult::Complete(buffer)
            }
            Step::Pending => {
                log.held = Some(buffer);
                ReadResult::Pending
            }
            Step::Eof => ReadResult::Complete(buffer),
            Step::Fail(e) => ReadResult::Failed(e),
        }
    }

    fn set_extra_headers(&mut self, headers: HeaderMap) {
        self.log.lock().unwrap().headers = headers;
    }

    fn set_referrer(&mut self, referrer: String) {
        self.log.lock().unwrap().referrer = Some(referrer);
    }

    fn set_method(&mut self, method: Method) {
        self.log.lock().unwrap().method = Some(method);
    }

    fn append_bytes_to_upload(&mut self, chunk: Bytes) {
        self.log.lock().unwrap().upload.push(chunk);
    }

    fn set_auth(&mut self, credentials: AuthCredentials) {
        self.log.lock().unwrap().auth = Some((
            credentials.username().to_string(),
            credentials.password().to_string(),
        ));
    }

    fn cancel_auth(&mut self) {
        self.log.lock().unwrap().auth_cancelled = true;
    }

    fn response_info(&self) -> ResponseInfo {
        self.info.clone()
    }

    fn status(&self) -> TransportStatus {
        self.status.clone()
    }
}

impl TransportHandle {
    pub fn log(&self) -> std::sync::MutexGuard<'_, TransportLog> {
        self.log.lock().unwrap()
    }

    /// The delegate passed to `start`, as the transport thread would see it.
    pub fn delegate(&self) -> Arc<dyn TransportDelegate> {
        let weak = self.log().delegate.clone().expect("transport not started");
        weak.upgrade().expect("request dropped")
    }

    /// Fill the buffer kept by a pending read.
    pub fn take_pending(&self, data: &[u8]) -> IoBuffer {
        let mut buffer = self.log().held.take().expect("no pending read");
        buffer.fill_from(data);
        buffer
    }
}

pub fn ok_info(url: &str) -> ResponseInfo {
    ResponseInfo {
        url: Some(Url::parse(url).unwrap()),
        mime_type: "text/html".into(),
        charset: "utf-8".into(),
        expected_content_size: -1,
        status: Some(http::StatusCode::OK),
        headers: HeaderMap::new(),
    }
}

pub struct Harness {
    pub queue: MainThreadQueue,
    pub client: Arc<RecordingClient>,
    pub handle: LoaderClientHandle,
    pub context: Arc<WebRequestContext>,
}

pub fn harness() -> Harness {
    harness_with_context(WebRequestContext::new())
}

pub fn harness_with_context(context: WebRequestContext) -> Harness {
    let (main_thread, queue) = MainThread::new();
    let client = Arc::new(RecordingClient::default());
    let handle = LoaderClientHandle::new(client.clone(), main_thread);
    Harness {
        queue,
        client,
        handle,
        context: Arc::new(context),
    }
}

impl Harness {
    pub fn network(&self, url: &str, steps: Vec<Step>) -> (Arc<WebRequest>, TransportHandle) {
        let (transport, handle) = ScriptedTransport::with_info(steps, ok_info(url), TransportStatus::Success);
        let request = WebResourceRequest::new(url).unwrap();
        (self.request(request, transport), handle)
    }

    pub fn request(
        &self,
        request: WebResourceRequest,
        transport: Box<dyn Transport>,
    ) -> Arc<WebRequest> {
        WebRequest::new(self.context.clone(), self.handle.clone(), request, transport)
    }

    /// Run queued notifications on this thread and return everything seen.
    pub fn drain(&mut self) -> Vec<Event> {
        self.queue.run_until_idle();
        self.client.events()
    }
}
