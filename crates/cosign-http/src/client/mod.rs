//! Console gateway client implementation.

mod config;
mod gateway;
pub mod native_network;

pub use config::{ClientConfig, BASE_URL_ENV, TIMEOUT_ENV};
pub use gateway::GatewayClient;
pub use native_network::NativeNetwork;
