use crate::error::Result;
use crate::types::{ConsoleRequest, ConsoleResponse};
use async_trait::async_trait;

/// Abstraction for network operations.
///
/// Implementations return `Ok` for every HTTP response regardless of status;
/// `Err` is reserved for failures where no response arrived (connection
/// errors, timeouts), always as [`ConsoleError::Transport`](crate::ConsoleError::Transport).
#[async_trait]
pub trait ConsoleNetwork: Send + Sync + 'static {
    async fn fetch(&self, url: &str, request: ConsoleRequest) -> Result<ConsoleResponse>;
}
