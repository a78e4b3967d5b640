//! Session context injected into the client
//!
//! The credential is supplied by the caller and forwarded verbatim; the
//! client never inspects or refreshes it. Without a credential the client
//! operates in anonymous read-only mode and refuses owner-scoped operations
//! locally, before any network call.

use crate::error::{Error, Result};

/// Identity and credential of the authenticated owner, or anonymous mode
#[derive(Debug, Clone, Default)]
pub enum Session {
    /// Catalog reads only; owner-scoped operations fail with
    /// [`Error::AuthRequired`]
    #[default]
    Anonymous,
    /// Signed-in owner with a bearer credential
    Authenticated {
        username: String,
        access_token: String,
    },
}

impl Session {
    /// Create an authenticated session
    pub fn authenticated(username: impl Into<String>, access_token: impl Into<String>) -> Self {
        Session::Authenticated {
            username: username.into(),
            access_token: access_token.into(),
        }
    }

    /// Whether a credential is present
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    /// The signed-in username, if any
    pub fn username(&self) -> Option<&str> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated { username, .. } => Some(username),
        }
    }

    /// The bearer credential, if any
    pub fn token(&self) -> Option<&str> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated { access_token, .. } => Some(access_token),
        }
    }

    /// The bearer credential, or [`Error::AuthRequired`] in anonymous mode
    pub fn require_token(&self) -> Result<&str> {
        self.token().ok_or(Error::AuthRequired)
    }
}
