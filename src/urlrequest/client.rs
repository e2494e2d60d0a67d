//! The consumer side of a load: the sink notified on the owner thread.

use crate::http::{AuthChallengeInfo, WebResponse};
use crate::urlrequest::iobuffer::IoBuffer;
use crate::urlrequest::mainthread::MainThread;
use bytes::Bytes;
use std::fmt;
use std::sync::Arc;

/// Receives the events of one load, always on the owner thread and in the
/// order they happened. Every load ends with exactly one of
/// [`did_finish_loading`](Self::did_finish_loading) or
/// [`did_fail`](Self::did_fail).
pub trait WebUrlLoaderClient: Send + Sync {
    fn did_receive_response(&self, response: WebResponse);

    /// A redirect is about to be followed; the response carries the target.
    fn will_send_request(&self, response: WebResponse);

    fn auth_required(&self, challenge: AuthChallengeInfo);

    /// A body chunk read from the network.
    fn did_receive_data(&self, buffer: IoBuffer);

    /// A body chunk pulled from an embedded input stream.
    fn did_receive_stream_data(&self, data: Bytes);

    /// The whole decoded body of a `data:` URL.
    fn did_receive_data_url(&self, data: Bytes);

    fn did_fail(&self, response: WebResponse);

    fn did_finish_loading(&self);
}

/// A client bound to the thread it must be called on.
///
/// Each posted notification holds its own reference to the client, so the
/// client outlives every queued notification even after the request lets
/// go of this handle.
#[derive(Clone)]
pub struct LoaderClientHandle {
    client: Arc<dyn WebUrlLoaderClient>,
    main_thread: MainThread,
}

impl LoaderClientHandle {
    pub fn new(client: Arc<dyn WebUrlLoaderClient>, main_thread: MainThread) -> Self {
        Self {
            client,
            main_thread,
        }
    }

    /// Queue `notify` to run against the client on the owner thread.
    pub fn post<F>(&self, notify: F)
    where
        F: FnOnce(&dyn WebUrlLoaderClient) + Send + 'static,
    {
        let client = Arc::clone(&self.client);
        self.main_thread.post(move || notify(client.as_ref()));
    }
}

impl fmt::Debug for LoaderClientHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderClientHandle")
            .field("main_thread", &self.main_thread)
            .finish()
    }
}
