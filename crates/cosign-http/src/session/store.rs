//! The single owner of the session value.

use super::{Credential, Identity, Session, SessionStorage};
use crate::error::{ConsoleError, Result};
use crate::session::MemoryStorage;
use crate::types::UserRole;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{error, info, warn};

pub const KEY_TOKEN: &str = "token";
pub const KEY_USER_ID: &str = "userId";
pub const KEY_USERNAME: &str = "username";

/// Entries written and erased together.
pub const PERSISTED_KEYS: [&str; 3] = [KEY_TOKEN, KEY_USER_ID, KEY_USERNAME];

/// Holds the current [`Session`] and its persisted copy.
///
/// The session is replaced as a whole under a write lock, so readers only
/// ever see `Anonymous` or a fully populated session. The persisted copy is
/// updated inside the same critical section.
pub struct SessionStore {
    state: RwLock<Arc<Session>>,
    storage: Box<dyn SessionStorage>,
}

impl SessionStore {
    /// Open the store over `storage`, rehydrating any persisted session.
    ///
    /// No network validation happens here; a stale credential is discovered
    /// on the first rejected request.
    pub fn open(storage: impl SessionStorage) -> Self {
        let session = rehydrate(&storage);
        if session.is_authenticated() {
            info!("[Session] Rehydrated persisted session");
        }
        Self {
            state: RwLock::new(Arc::new(session)),
            storage: Box::new(storage),
        }
    }

    /// Store backed by [`MemoryStorage`].
    pub fn in_memory() -> Self {
        Self::open(MemoryStorage::new())
    }

    /// Snapshot of the present session. No side effects.
    pub fn current(&self) -> Arc<Session> {
        self.state.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated()
    }

    /// Replace whatever session exists with a populated one and persist it.
    ///
    /// The in-memory value only changes once the entries are persisted; on a
    /// storage failure the previous session stays in place.
    pub fn establish(&self, credential: Credential, identity: Identity) -> Result<()> {
        if credential.is_empty() {
            return Err(ConsoleError::InvalidCredential(
                "credential must not be empty".to_string(),
            ));
        }

        let mut state = self.state.write();
        self.storage.store(&[
            (KEY_TOKEN, credential.as_str()),
            (KEY_USER_ID, identity.user_id.as_str()),
            (KEY_USERNAME, identity.username.as_str()),
        ])?;

        info!("[Session] Established for user {}", identity.user_id);
        *state = Arc::new(Session::Authenticated {
            credential,
            identity,
        });
        Ok(())
    }

    /// Reset to `Anonymous` and erase the persisted copy.
    ///
    /// Returns `true` when a populated session was actually cleared. Clearing
    /// an empty store touches nothing. A failed erase is logged; memory is
    /// cleared regardless.
    pub fn clear(&self) -> bool {
        self.clear_when(|_| true)
    }

    /// Clear only while `credential` is still the current one.
    ///
    /// A rejection of an older credential must not end a session established
    /// after it. Returns `true` when this call cleared the session.
    pub fn clear_if(&self, credential: &Credential) -> bool {
        self.clear_when(|session| session.credential() == Some(credential))
    }

    fn clear_when(&self, matches: impl FnOnce(&Session) -> bool) -> bool {
        let mut state = self.state.write();
        if !state.is_authenticated() || !matches(&**state) {
            return false;
        }

        if let Err(e) = self.storage.remove(&PERSISTED_KEYS) {
            error!("[Session] Failed to erase persisted session: {}", e);
        }
        *state = Arc::new(Session::Anonymous);
        info!("[Session] Cleared");
        true
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.as_str()).filter(|v| !v.trim().is_empty())
}

/// Rebuild the session from persisted entries.
///
/// A credential without both identity entries is an incomplete write from an
/// earlier process. It is treated as no session and the leftovers are erased.
fn rehydrate(storage: &dyn SessionStorage) -> Session {
    let entries = match storage.load(&PERSISTED_KEYS) {
        Ok(entries) => entries,
        Err(e) => {
            error!("[Session] Failed to read persisted session: {}", e);
            return Session::Anonymous;
        }
    };

    if entries.is_empty() {
        return Session::Anonymous;
    }

    let token = non_empty(entries.get(KEY_TOKEN));
    let user_id = non_empty(entries.get(KEY_USER_ID));
    let username = non_empty(entries.get(KEY_USERNAME));

    match (token, user_id, username) {
        (Some(token), Some(user_id), Some(username)) => Session::Authenticated {
            credential: Credential::new(token),
            identity: Identity::new(user_id, username, UserRole::User),
        },
        _ => {
            warn!(
                "[Session] Discarding incomplete persisted session (entries present: {:?})",
                entries.keys().collect::<Vec<_>>()
            );
            if let Err(e) = storage.remove(&PERSISTED_KEYS) {
                error!("[Session] Failed to erase incomplete session: {}", e);
            }
            Session::Anonymous
        }
    }
}
