//! The single outbound request path of the console.
//!
//! Every request picks up the current credential here, every response is
//! classified here, and every 401 funnels into one session reaction.

use crate::client::config::ClientConfig;
use crate::client::native_network::NativeNetwork;
use crate::envelope::{decode_envelope, error_message};
use crate::error::{ConsoleError, Result};
use crate::guard::{NavigationReason, Navigator, View};
use crate::session::{Credential, SessionStore};
use crate::traits::ConsoleNetwork;
use crate::types::{ConsoleRequest, ConsoleResponse};
use serde::de::{DeserializeOwned, IgnoredAny};
use std::sync::Arc;
use tracing::{debug, warn};

const UNAUTHORIZED: &str = "Unauthorized";

/// Authenticated gateway to the co-signing service.
#[derive(Clone)]
pub struct GatewayClient {
    network: Arc<dyn ConsoleNetwork>,
    config: Arc<ClientConfig>,
    session: Arc<SessionStore>,
    navigator: Arc<Navigator>,
}

impl GatewayClient {
    /// Gateway over a reqwest transport built from `config`.
    pub fn new(config: ClientConfig, session: Arc<SessionStore>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ConsoleError::Config(e.to_string()))?;
        let network = Arc::new(NativeNetwork::new(client, config.request_timeout_ms));
        Ok(Self::with_network(network, config, session))
    }

    /// Gateway over any transport, e.g. a scripted one in tests.
    pub fn with_network(
        network: Arc<dyn ConsoleNetwork>,
        config: ClientConfig,
        session: Arc<SessionStore>,
    ) -> Self {
        let navigator = Arc::new(Navigator::new(session.clone()));
        GatewayClient {
            network,
            config: Arc::new(config),
            session,
            navigator,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn navigator(&self) -> &Arc<Navigator> {
        &self.navigator
    }

    /// Send `request` and unwrap the envelope's `data` as `T`.
    pub async fn send<T: DeserializeOwned>(&self, request: ConsoleRequest) -> Result<T> {
        let response = self.dispatch(request).await?;
        decode_envelope(&response.body)
    }

    /// Send `request` for an endpoint whose `data` carries nothing of interest.
    pub async fn send_unit(&self, request: ConsoleRequest) -> Result<()> {
        self.send::<IgnoredAny>(request).await.map(|_| ())
    }

    /// Forget the session and return the UI to the entry view.
    ///
    /// Safe to call any number of times: only a call that finds a populated
    /// session erases storage, and navigating to the view already shown is a
    /// no-op. Returns whether this call cleared the session.
    pub fn invalidate_session(&self) -> bool {
        let cleared = self.session.clear();
        self.after_invalidation(cleared);
        cleared
    }

    /// React to a 401 for the credential the request carried.
    ///
    /// Only the session that owned `rejected` is cleared. A session
    /// established while the request was in flight is left alone.
    fn reject_credential(&self, rejected: Option<&Credential>) {
        let cleared = rejected.is_some_and(|c| self.session.clear_if(c));
        if cleared || !self.session.is_authenticated() {
            self.after_invalidation(cleared);
        } else {
            debug!("[Gateway] 401 for a superseded credential; current session kept");
        }
    }

    fn after_invalidation(&self, cleared: bool) {
        let reason = if cleared {
            warn!("[Gateway] Credential rejected by server; session cleared");
            NavigationReason::SessionInvalidated
        } else {
            NavigationReason::Redirected
        };
        self.navigator.navigate_to(View::ENTRY, reason);
    }

    /// Attach the credential, send, and classify the transport outcome.
    /// Returns only 2xx responses; their bodies still need envelope decoding.
    async fn dispatch(&self, mut request: ConsoleRequest) -> Result<ConsoleResponse> {
        let mut attached = None;
        if !request.anonymous {
            let session = self.session.current();
            if let Some(credential) = session.credential() {
                request = request.with_header(http::header::AUTHORIZATION.as_str(), credential.bearer());
                attached = Some(credential.clone());
            }
        }

        let url = self.config.url_for(&request.path, &request.query)?;
        let method = request.method.clone();
        let path = request.path.clone();
        self.log_request(&method, &path, &request);

        let response = match self.network.fetch(url.as_str(), request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("[Gateway] {} {} failed: {}", method, path, e);
                return Err(e);
            }
        };
        self.log_response(&method, &path, &response);

        if response.is_unauthorized() {
            self.reject_credential(attached.as_ref());
            let message = error_message(&response.body).unwrap_or_else(|| UNAUTHORIZED.to_string());
            return Err(ConsoleError::AuthenticationRejected(message));
        }

        if !response.is_success() {
            let message = transport_message(&response);
            warn!("[Gateway] {} {} -> {}: {}", method, path, response.status, message);
            return Err(ConsoleError::Transport(message));
        }

        Ok(response)
    }

    fn log_request(&self, method: &str, path: &str, request: &ConsoleRequest) {
        debug!(
            "[Gateway-Out] {} {} authenticated={}",
            method,
            path,
            request.header("authorization").is_some()
        );
    }

    fn log_response(&self, method: &str, path: &str, response: &ConsoleResponse) {
        if self.config.enable_logging {
            debug!(
                "[Gateway-In] {} {} -> {} ({} bytes)",
                method,
                path,
                response.status,
                response.body.len()
            );
        }
    }
}

/// Server message first, then the status line.
fn transport_message(response: &ConsoleResponse) -> String {
    error_message(&response.body)
        .unwrap_or_else(|| format!("Request failed with status code {}", response.status))
}
