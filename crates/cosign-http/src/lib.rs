//! Authenticated gateway to the co-signing service.
//!
//! Every outbound request goes through [`GatewayClient`], which attaches the
//! session credential, unwraps the `{code, message, data}` envelope and turns
//! a 401 into a single session invalidation. [`Navigator`] applies the route
//! guard against the same [`SessionStore`].

pub mod api;
pub mod client;
pub mod envelope;
pub mod error;
pub mod guard;
pub mod session;
pub mod traits;
pub mod types;

pub use api::ConsoleApi;
pub use client::{ClientConfig, GatewayClient, NativeNetwork};
pub use envelope::{decode_envelope, Envelope};
pub use error::{ConsoleError, Result};
pub use guard::{guard, GuardDecision, NavigationEvent, NavigationReason, Navigator, View};
pub use session::{
    Credential, FileStorage, Identity, MemoryStorage, Session, SessionStorage, SessionStore,
};
pub use traits::ConsoleNetwork;
pub use types::{ConsoleRequest, ConsoleResponse};
