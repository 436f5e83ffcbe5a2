//! Domain API facades.
//!
//! Thin wrappers that build a [`ConsoleRequest`], send it through the
//! [`GatewayClient`] and hand back the unwrapped `data`.

mod auth;
mod keys;
mod logs;
mod monitor;
mod sign;
mod users;

use crate::client::GatewayClient;
use crate::types::ConsoleRequest;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped in a single path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'?')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}');

fn segment(id: &str) -> String {
    utf8_percent_encode(id, SEGMENT).to_string()
}

/// Attach `value` as the JSON body.
fn json_request<T: serde::Serialize>(
    request: ConsoleRequest,
    value: &T,
) -> crate::Result<ConsoleRequest> {
    request
        .with_json(value)
        .map_err(|e| crate::ConsoleError::Config(format!("cannot encode request body: {}", e)))
}

/// Every endpoint of the co-signing service.
#[derive(Clone)]
pub struct ConsoleApi {
    gateway: GatewayClient,
}

impl ConsoleApi {
    pub fn new(gateway: GatewayClient) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &GatewayClient {
        &self.gateway
    }
}
