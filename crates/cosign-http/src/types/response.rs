//! Raw HTTP response as seen by the gateway, before envelope decoding.

use bytes::Bytes;
use std::collections::BTreeMap;

/// HTTP response returned by a [`ConsoleNetwork`](crate::traits::ConsoleNetwork).
#[derive(Clone, Debug)]
pub struct ConsoleResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Bytes,
}

impl ConsoleResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        ConsoleResponse {
            status,
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    /// Convenience for tests and mock transports: a JSON body.
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status, value.to_string()).with_header("content-type", "application/json")
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The server's "unauthenticated" signal.
    #[inline]
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}
