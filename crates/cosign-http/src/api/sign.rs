use super::{json_request, ConsoleApi};
use crate::error::Result;
use crate::types::{ConsoleRequest, SignRequest, SignResponse};

impl ConsoleApi {
    /// Request the server's half of a co-signature. `q1` and `e` pass through
    /// untouched.
    pub async fn sign(&self, request: &SignRequest) -> Result<SignResponse> {
        let request = json_request(ConsoleRequest::post("/api/sign"), request)?;
        self.gateway.send(request).await
    }
}
