pub mod auth;
pub mod dataurl;
pub mod mimeutil;
pub mod response;
pub mod upload;

// Re-exports for convenience
pub use auth::{AuthChallengeInfo, AuthCredentials};
pub use dataurl::DataUrl;
pub use response::WebResponse;
pub use upload::UploadData;
