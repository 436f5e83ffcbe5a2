use super::print_json;
use cosign_http::{guard, ConsoleApi, GuardDecision, Session, View};
use serde_json::json;

pub async fn login(api: &ConsoleApi, username: &str, password: &str) -> anyhow::Result<()> {
    let response = api.login(username, password).await?;
    print_json(&json!({
        "userId": response.user_id,
        "username": username,
        "expiresAt": response.expires_at,
    }))
}

pub async fn logout(api: &ConsoleApi) -> anyhow::Result<()> {
    api.logout().await?;
    println!("logged out");
    Ok(())
}

pub fn whoami(api: &ConsoleApi) -> anyhow::Result<()> {
    let session = api.gateway().session().current();
    let value = match session.as_ref() {
        Session::Authenticated { identity, .. } => json!({
            "authenticated": true,
            "userId": identity.user_id,
            "username": identity.username,
        }),
        Session::Anonymous => json!({ "authenticated": false }),
    };
    print_json(&value)
}

pub fn route(api: &ConsoleApi, path: &str) -> anyhow::Result<()> {
    let target = View::from_path(path);
    let decision = guard(target, api.gateway().session().is_authenticated());
    let outcome = match decision {
        GuardDecision::Allow(_) => "allow",
        GuardDecision::Redirect(_) => "redirect",
    };
    print_json(&json!({
        "path": path,
        "target": target.path(),
        "decision": outcome,
        "view": decision.destination().path(),
    }))
}
