//! Client-side session state: the credential, the identity it belongs to, and
//! the store that persists both.

mod storage;
mod store;

pub use storage::{FileStorage, MemoryStorage, SessionStorage};
pub use store::{SessionStore, KEY_TOKEN, KEY_USERNAME, KEY_USER_ID, PERSISTED_KEYS};

use crate::types::UserRole;
use std::fmt;

/// Opaque bearer token issued at login.
///
/// Validity is decided by the server; the console never inspects it.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Credential(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// `Authorization` header value.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Descriptive metadata of the signed-in account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub username: String,
    pub role: UserRole,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, username: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            role,
        }
    }
}

/// Current authentication state. Credential and identity exist together or
/// not at all.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated {
        credential: Credential,
        identity: Identity,
    },
}

impl Session {
    #[inline]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    pub fn credential(&self) -> Option<&Credential> {
        match self {
            Session::Authenticated { credential, .. } => Some(credential),
            Session::Anonymous => None,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Session::Authenticated { identity, .. } => Some(identity),
            Session::Anonymous => None,
        }
    }
}
