use crate::error::{ConsoleError, Result, NETWORK_ERROR};
use crate::traits::ConsoleNetwork;
use crate::types::{ConsoleRequest, ConsoleResponse};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::BTreeMap;

/// reqwest-backed transport.
pub struct NativeNetwork {
    client: Client,
    timeout_ms: u64,
}

impl NativeNetwork {
    pub fn new(client: Client, timeout_ms: u64) -> Self {
        Self { client, timeout_ms }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    fn transport_error(&self, e: reqwest::Error) -> ConsoleError {
        if e.is_timeout() {
            return ConsoleError::Transport(format!("timeout of {}ms exceeded", self.timeout_ms));
        }
        let msg = e.to_string();
        if msg.trim().is_empty() {
            ConsoleError::Transport(NETWORK_ERROR.to_string())
        } else {
            ConsoleError::Transport(msg)
        }
    }
}

#[async_trait]
impl ConsoleNetwork for NativeNetwork {
    async fn fetch(&self, url: &str, request: ConsoleRequest) -> Result<ConsoleResponse> {
        let method = reqwest::Method::from_bytes(request.method.to_uppercase().as_bytes())
            .map_err(|_| ConsoleError::Config(format!("invalid HTTP method {:?}", request.method)))?;

        let mut req_builder = self.client.request(method, url);

        for (k, v) in &request.extra_headers {
            req_builder = req_builder.header(k, v);
        }

        if request.has_body() {
            let ct = request
                .content_type
                .as_deref()
                .unwrap_or("application/json");
            req_builder = req_builder.header(reqwest::header::CONTENT_TYPE, ct);
            req_builder = req_builder.body(request.body.clone());
        }

        let response = req_builder
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status().as_u16();
        let mut headers = BTreeMap::new();
        for (k, v) in response.headers() {
            if let Ok(val) = v.to_str() {
                headers.insert(k.as_str().to_string(), val.to_string());
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        Ok(ConsoleResponse {
            status,
            headers,
            body,
        })
    }
}
