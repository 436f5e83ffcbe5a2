//! Route guard and the navigator that applies it.
//!
//! The guard is a pure decision over `(target view, is authenticated)`. The
//! [`Navigator`] re-reads the session and re-runs the guard on every
//! navigation attempt, and publishes the resulting view changes to whoever
//! hosts the UI.

use crate::session::SessionStore;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

/// Views of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    /// Unauthenticated entry view.
    Login,
    /// Default protected view.
    Dashboard,
    Keys,
    Sign,
    Users,
    Logs,
}

impl View {
    pub const ENTRY: View = View::Login;
    pub const DEFAULT_PROTECTED: View = View::Dashboard;

    /// Resolve a path. `/` and unknown paths land on the dashboard.
    pub fn from_path(path: &str) -> View {
        let trimmed = path.split(['?', '#']).next().unwrap_or("");
        match trimmed.trim_end_matches('/') {
            "/login" => View::Login,
            "/dashboard" => View::Dashboard,
            "/keys" => View::Keys,
            "/sign" => View::Sign,
            "/users" => View::Users,
            "/logs" => View::Logs,
            _ => View::Dashboard,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            View::Login => "/login",
            View::Dashboard => "/dashboard",
            View::Keys => "/keys",
            View::Sign => "/sign",
            View::Users => "/users",
            View::Logs => "/logs",
        }
    }

    /// Everything except the entry view requires a session.
    #[inline]
    pub fn is_protected(&self) -> bool {
        !matches!(self, View::Login)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow(View),
    Redirect(View),
}

impl GuardDecision {
    /// Where the navigation ends up.
    pub fn destination(&self) -> View {
        match self {
            GuardDecision::Allow(v) | GuardDecision::Redirect(v) => *v,
        }
    }
}

/// Decide whether `target` may be shown.
pub fn guard(target: View, is_authenticated: bool) -> GuardDecision {
    if target.is_protected() && !is_authenticated {
        GuardDecision::Redirect(View::ENTRY)
    } else if target == View::ENTRY && is_authenticated {
        GuardDecision::Redirect(View::DEFAULT_PROTECTED)
    } else {
        GuardDecision::Allow(target)
    }
}

/// Why a view change happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationReason {
    Requested,
    Redirected,
    LoggedIn,
    LoggedOut,
    SessionInvalidated,
}

/// Published on every actual view change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEvent {
    pub from: Option<View>,
    pub to: View,
    pub reason: NavigationReason,
}

const EVENT_CAPACITY: usize = 64;

/// Owns the current view and publishes changes to subscribers.
pub struct Navigator {
    session: Arc<SessionStore>,
    current: Mutex<Option<View>>,
    tx: broadcast::Sender<NavigationEvent>,
}

impl Navigator {
    pub fn new(session: Arc<SessionStore>) -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            session,
            current: Mutex::new(None),
            tx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NavigationEvent> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> Option<View> {
        *self.current.lock()
    }

    /// User-initiated navigation to `path`.
    pub fn navigate(&self, path: &str) -> Option<NavigationEvent> {
        self.navigate_to(View::from_path(path), NavigationReason::Requested)
    }

    /// Navigate to `target`, subject to the guard.
    ///
    /// Returns the published event, or `None` when the guarded destination is
    /// already the current view.
    pub fn navigate_to(&self, target: View, reason: NavigationReason) -> Option<NavigationEvent> {
        let mut current = self.current.lock();
        let decision = guard(target, self.session.is_authenticated());
        let to = decision.destination();

        if *current == Some(to) {
            return None;
        }

        let reason = match decision {
            GuardDecision::Redirect(_) => NavigationReason::Redirected,
            GuardDecision::Allow(_) => reason,
        };
        let event = NavigationEvent {
            from: *current,
            to,
            reason,
        };
        *current = Some(to);
        drop(current);

        debug!("[Navigator] {:?} -> {} ({:?})", event.from, event.to, event.reason);
        // no subscribers is fine
        let _ = self.tx.send(event.clone());
        Some(event)
    }
}
