//! Request lifecycle: the per-load state machine, its content sources, and
//! the owner-thread notification plumbing.

pub mod assets;
pub mod client;
pub mod context;
pub mod iobuffer;
pub mod mainthread;
pub mod request;
pub mod source;
pub mod webrequest;

pub use client::{LoaderClientHandle, WebUrlLoaderClient};
pub use context::{WebRequestContext, WebRequestContextConfig};
pub use iobuffer::IoBuffer;
pub use mainthread::{MainThread, MainThreadQueue};
pub use request::WebResourceRequest;
pub use webrequest::WebRequest;
