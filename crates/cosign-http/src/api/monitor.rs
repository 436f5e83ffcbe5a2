use super::ConsoleApi;
use crate::error::Result;
use crate::types::{ConsoleRequest, HealthCheck, SystemStats};

impl ConsoleApi {
    pub async fn stats(&self) -> Result<SystemStats> {
        self.gateway.send(ConsoleRequest::get("/mapi/stats")).await
    }

    pub async fn health(&self) -> Result<HealthCheck> {
        self.gateway.send(ConsoleRequest::get("/mapi/health")).await
    }
}
