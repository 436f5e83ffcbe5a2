use super::{segment, ConsoleApi};
use crate::error::Result;
use crate::types::{ConsoleRequest, KeyInfo, Paginated};

impl ConsoleApi {
    pub async fn list_keys(&self) -> Result<Vec<KeyInfo>> {
        let page: Paginated<KeyInfo> = self.gateway.send(ConsoleRequest::get("/mapi/keys")).await?;
        Ok(page.list)
    }

    pub async fn delete_key(&self, id: &str) -> Result<()> {
        let path = format!("/mapi/keys/{}", segment(id));
        self.gateway.send_unit(ConsoleRequest::delete(path)).await
    }
}
