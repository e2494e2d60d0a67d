//! # webrequest
//!
//! The loader core of a browser engine's network layer, in the style of
//! Chromium's `net/`.
//!
//! A [`WebRequest`](urlrequest::WebRequest) drives one resource load. It
//! sits between a network [`Transport`](transport::Transport) that calls
//! back on a background I/O thread and a
//! [`WebUrlLoaderClient`](urlrequest::WebUrlLoaderClient) that must only be
//! touched on its owner thread. Every event becomes one notification posted
//! through a [`MainThread`](urlrequest::MainThread) queue.
//!
//! ## Features
//!
//! - **Lifecycle state machine**: `Created → Started → Response → GotData →
//!   Finished`, with race-safe cancellation
//! - **Incremental reads**: one 32 KiB buffer in flight at a time, with
//!   synchronous chunks forwarded in the same turn
//! - **Redirects and auth**: surfaced to the client, with credentials
//!   forwarded back to the transport
//! - **Local content**: `data:` URLs, embedder input streams, and
//!   synthesized `browser:` pages served without the network
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use webrequest::urlrequest::{
//!     LoaderClientHandle, MainThread, WebRequest, WebRequestContext, WebResourceRequest,
//! };
//!
//! let (main_thread, mut queue) = MainThread::new();
//! let client = LoaderClientHandle::new(my_client, main_thread);
//! let request = WebResourceRequest::new("data:text/plain;charset=utf-8,hello")?;
//! let load = WebRequest::new(Arc::new(WebRequestContext::new()), client, request, transport);
//! load.start(false);
//! queue.run_until_idle(); // did_receive_response, did_receive_data_url, did_finish_loading
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Load states and error definitions
//! - [`http`] - Response descriptors, auth types, data URLs, MIME lookup
//! - [`transport`] - The network transport interface
//! - [`urlrequest`] - The request state machine and owner-thread plumbing

pub mod base;
pub mod http;
pub mod transport;
pub mod urlrequest;
