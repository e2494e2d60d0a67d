//! Authentication challenge and credential types.

use std::fmt;
use zeroize::Zeroizing;

/// Describes a 401/407 challenge so the client can prompt for credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthChallengeInfo {
    /// Whether the challenge came from a proxy (407) rather than the origin.
    pub is_proxy: bool,
    /// `host:port` of the challenger.
    pub challenger: String,
    /// Auth scheme, e.g. "basic" or "digest".
    pub scheme: String,
    /// Protection space announced by the server.
    pub realm: String,
}

/// Username and password supplied in answer to a challenge.
#[derive(Clone)]
pub struct AuthCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl AuthCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Zeroizing::new(password.into()),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for AuthCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
