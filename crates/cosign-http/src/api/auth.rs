//! Login, logout and the signed-in user's profile.

use super::{json_request, ConsoleApi};
use crate::error::{ConsoleError, Result};
use crate::guard::{NavigationReason, View};
use crate::session::{Credential, Identity};
use crate::types::{ConsoleRequest, LoginRequest, LoginResponse, UserInfo, UserRole};
use tracing::{info, warn};

impl ConsoleApi {
    /// Exchange username and password for a session.
    ///
    /// The request goes out without a credential. On success the session is
    /// established and the UI moves to the dashboard.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
            signature: None,
        };
        let request = json_request(ConsoleRequest::post("/api/login").anonymous(), &body)?;
        let response: LoginResponse = self.gateway.send(request).await?;

        let credential = Credential::new(response.token.clone());
        if credential.is_empty() {
            return Err(ConsoleError::InvalidCredential(
                "server returned an empty token".to_string(),
            ));
        }
        let identity = Identity::new(response.user_id.clone(), username, UserRole::User);
        self.gateway.session().establish(credential, identity)?;
        info!("[Auth] Logged in as {}", username);

        self.gateway
            .navigator()
            .navigate_to(View::DEFAULT_PROTECTED, NavigationReason::LoggedIn);
        Ok(response)
    }

    /// End the session. Always effective locally, even if the server call
    /// fails.
    pub async fn logout(&self) -> Result<()> {
        if self.gateway.session().is_authenticated() {
            if let Err(e) = self
                .gateway
                .send_unit(ConsoleRequest::post("/api/logout"))
                .await
            {
                warn!("[Auth] Server logout failed: {}", e);
            }
        }
        self.gateway.session().clear();
        self.gateway
            .navigator()
            .navigate_to(View::ENTRY, NavigationReason::LoggedOut);
        Ok(())
    }

    pub async fn user_info(&self) -> Result<UserInfo> {
        self.gateway.send(ConsoleRequest::get("/api/user/info")).await
    }
}
