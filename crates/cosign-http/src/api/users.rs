use super::{json_request, segment, ConsoleApi};
use crate::error::Result;
use crate::types::{ConsoleRequest, Paginated, RecordStatus, UserInfo};
use serde_json::json;

impl ConsoleApi {
    pub async fn list_users(&self) -> Result<Vec<UserInfo>> {
        let page: Paginated<UserInfo> =
            self.gateway.send(ConsoleRequest::get("/mapi/users")).await?;
        Ok(page.list)
    }

    pub async fn get_user(&self, id: &str) -> Result<UserInfo> {
        let path = format!("/mapi/users/{}", segment(id));
        self.gateway.send(ConsoleRequest::get(path)).await
    }

    pub async fn delete_user(&self, id: &str) -> Result<()> {
        let path = format!("/mapi/users/{}", segment(id));
        self.gateway.send_unit(ConsoleRequest::delete(path)).await
    }

    /// Enable or disable an account.
    pub async fn update_user_status(&self, id: &str, status: RecordStatus) -> Result<()> {
        let path = format!("/mapi/users/{}/status", segment(id));
        let request = json_request(ConsoleRequest::put(path), &json!({ "status": status }))?;
        self.gateway.send_unit(request).await
    }
}

#[cfg(test)]
mod tests {
    use crate::api::tests::{api, Scripted};
    use crate::error::ConsoleError;
    use crate::types::{ConsoleResponse, RecordStatus};
    use serde_json::json;

    fn user(id: &str) -> serde_json::Value {
        json!({"id": id, "username": "bob", "publicKey": "04cc", "status": 0, "createdAt": ""})
    }

    #[tokio::test]
    async fn test_get_and_list_users() {
        let net = Scripted::new(|req| {
            let data = if req.path == "/mapi/users" {
                json!({"list": [user("u1"), user("u2")], "total": 2})
            } else {
                user("u2")
            };
            Ok(ConsoleResponse::json(200, &json!({"code": 0, "data": data})))
        });
        let api = api(net, true);

        assert_eq!(api.list_users().await.unwrap().len(), 2);
        let one = api.get_user("u2").await.unwrap();
        assert_eq!(one.id, "u2");
        assert_eq!(one.status, RecordStatus::Disabled);
    }

    #[tokio::test]
    async fn test_update_status_body() {
        let net = Scripted::new(|_| Ok(ConsoleResponse::json(200, &json!({"code": 0, "data": {}}))));
        let api = api(net.clone(), true);
        api.update_user_status("u1", RecordStatus::Enabled).await.unwrap();

        let seen = net.seen.lock();
        assert_eq!(seen[0].1.method, "PUT");
        assert_eq!(seen[0].1.path, "/mapi/users/u1/status");
        let sent: serde_json::Value = serde_json::from_slice(&seen[0].1.body).unwrap();
        assert_eq!(sent, json!({"status": 1}));
    }

    #[tokio::test]
    async fn test_delete_user_application_error() {
        let net = Scripted::new(|_| {
            Ok(ConsoleResponse::json(200, &json!({"code": 2003, "message": "user has active keys"})))
        });
        let api = api(net, true);
        let err = api.delete_user("u1").await.unwrap_err();
        assert!(err.is_application());
        assert_eq!(err.to_string(), "user has active keys");
        assert!(!matches!(err, ConsoleError::AuthenticationRejected(_)));
    }
}
