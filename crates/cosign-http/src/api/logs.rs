use super::ConsoleApi;
use crate::error::Result;
use crate::types::{AuditLog, ConsoleRequest, LogQuery, Paginated};

impl ConsoleApi {
    /// Audit log entries matching `query`.
    pub async fn list_logs(&self, query: &LogQuery) -> Result<Vec<AuditLog>> {
        let request = ConsoleRequest::get("/mapi/logs").with_queries(query.to_query());
        let page: Paginated<AuditLog> = self.gateway.send(request).await?;
        Ok(page.list)
    }
}
