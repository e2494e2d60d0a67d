use std::io;
use thiserror::Error;

/// Errors surfaced by the transport and the content sources.
///
/// Codes follow Chromium's `net_error_list.h` so they can be handed to a
/// consumer that already speaks that numbering.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum NetError {
    // System Errors
    #[error("IO pending")]
    IoPending,
    #[error("Request failed")]
    Failed,
    #[error("Request aborted")]
    Aborted,
    #[error("Invalid argument")]
    InvalidArgument,
    #[error("File not found")]
    FileNotFound,
    #[error("Operation timed out")]
    TimedOut,
    #[error("Access denied")]
    AccessDenied,
    #[error("Upload file changed")]
    UploadFileChanged,

    // Connection Errors
    #[error("Connection closed (TCP FIN)")]
    ConnectionClosed,
    #[error("Connection reset (TCP RST)")]
    ConnectionReset,
    #[error("Connection refused")]
    ConnectionRefused,
    #[error("Connection aborted")]
    ConnectionAborted,
    #[error("Connection failed")]
    ConnectionFailed,
    #[error("Name not resolved")]
    NameNotResolved,
    #[error("Internet disconnected")]
    InternetDisconnected,
    #[error("SSL protocol error")]
    SslProtocolError,
    #[error("Connection timed out")]
    ConnectionTimedOut,

    // HTTP Errors
    #[error("Invalid URL")]
    InvalidUrl,
    #[error("Disallowed URL scheme")]
    DisallowedUrlScheme,
    #[error("Unknown URL scheme")]
    UnknownUrlScheme,
    #[error("Invalid redirect")]
    InvalidRedirect,
    #[error("Too many redirects")]
    TooManyRedirects,
    #[error("Unsafe redirect")]
    UnsafeRedirect,
    #[error("Invalid response")]
    InvalidResponse,
    #[error("Empty response")]
    EmptyResponse,
    #[error("Content decoding failed")]
    ContentDecodingFailed,
    #[error("Invalid auth credentials")]
    InvalidAuthCredentials,
    #[error("Unsupported auth scheme")]
    UnsupportedAuthScheme,
    #[error("Missing auth credentials")]
    MissingAuthCredentials,
    #[error("Content-Length mismatch")]
    ContentLengthMismatch,
    #[error("Incomplete chunked encoding")]
    IncompleteChunkedEncoding,

    // Local content errors
    #[error("Asset {name} unavailable: {kind}")]
    AssetUnavailable { name: String, kind: io::ErrorKind },

    #[error("Unknown error: {0}")]
    Unknown(i32),
}

impl NetError {
    pub fn as_i32(&self) -> i32 {
        match self {
            NetError::IoPending => -1,
            NetError::Failed => -2,
            NetError::Aborted => -3,
            NetError::InvalidArgument => -4,
            NetError::FileNotFound => -6,
            NetError::TimedOut => -7,
            NetError::AccessDenied => -10,
            NetError::UploadFileChanged => -14,

            NetError::ConnectionClosed => -100,
            NetError::ConnectionReset => -101,
            NetError::ConnectionRefused => -102,
            NetError::ConnectionAborted => -103,
            NetError::ConnectionFailed => -104,
            NetError::NameNotResolved => -105,
            NetError::InternetDisconnected => -106,
            NetError::SslProtocolError => -107,
            NetError::ConnectionTimedOut => -118,

            NetError::InvalidUrl => -300,
            NetError::DisallowedUrlScheme => -301,
            NetError::UnknownUrlScheme => -302,
            NetError::InvalidRedirect => -303,
            NetError::TooManyRedirects => -310,
            NetError::UnsafeRedirect => -311,
            NetError::InvalidResponse => -320,
            NetError::EmptyResponse => -324,
            NetError::ContentDecodingFailed => -330,
            NetError::InvalidAuthCredentials => -338,
            NetError::UnsupportedAuthScheme => -339,
            NetError::MissingAuthCredentials => -341,
            NetError::ContentLengthMismatch => -354,
            NetError::IncompleteChunkedEncoding => -355,

            // Custom codes start at -10000, outside Chromium's ranges.
            NetError::AssetUnavailable { .. } => -10000,
            NetError::Unknown(code) => *code,
        }
    }

    /// Whether this is the would-block signal rather than a failure.
    pub fn is_io_pending(&self) -> bool {
        matches!(self, NetError::IoPending)
    }
}

impl From<i32> for NetError {
    fn from(code: i32) -> Self {
        match code {
            -1 => NetError::IoPending,
            -2 => NetError::Failed,
            -3 => NetError::Aborted,
            -4 => NetError::InvalidArgument,
            -6 => NetError::FileNotFound,
            -7 => NetError::TimedOut,
            -10 => NetError::AccessDenied,
            -14 => NetError::UploadFileChanged,

            -100 => NetError::ConnectionClosed,
            -101 => NetError::ConnectionReset,
            -102 => NetError::ConnectionRefused,
            -103 => NetError::ConnectionAborted,
            -104 => NetError::ConnectionFailed,
            -105 => NetError::NameNotResolved,
            -106 => NetError::InternetDisconnected,
            -107 => NetError::SslProtocolError,
            -118 => NetError::ConnectionTimedOut,

            -300 => NetError::InvalidUrl,
            -301 => NetError::DisallowedUrlScheme,
            -302 => NetError::UnknownUrlScheme,
            -303 => NetError::InvalidRedirect,
            -310 => NetError::TooManyRedirects,
            -311 => NetError::UnsafeRedirect,
            -320 => NetError::InvalidResponse,
            -324 => NetError::EmptyResponse,
            -330 => NetError::ContentDecodingFailed,
            -338 => NetError::InvalidAuthCredentials,
            -339 => NetError::UnsupportedAuthScheme,
            -341 => NetError::MissingAuthCredentials,
            -354 => NetError::ContentLengthMismatch,
            -355 => NetError::IncompleteChunkedEncoding,
            _ => NetError::Unknown(code),
        }
    }
}
