//! Wire models for the co-signing service endpoints.
//!
//! All payloads use camelCase field names on the wire. Values the console
//! only displays (timestamps, public keys, signature components) stay opaque
//! strings.

use base64::Engine;
use serde::{Deserialize, Serialize};

/// Enabled/disabled flag carried by user and key records (`0` / `1`).
///
/// Any other number is kept as `Unknown` so one odd record does not fail a
/// whole page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum RecordStatus {
    Disabled,
    Enabled,
    Unknown(i64),
}

impl From<i64> for RecordStatus {
    fn from(value: i64) -> Self {
        match value {
            0 => RecordStatus::Disabled,
            1 => RecordStatus::Enabled,
            other => RecordStatus::Unknown(other),
        }
    }
}

impl From<RecordStatus> for i64 {
    fn from(status: RecordStatus) -> Self {
        match status {
            RecordStatus::Disabled => 0,
            RecordStatus::Enabled => 1,
            RecordStatus::Unknown(n) => n,
        }
    }
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordStatus::Disabled => f.write_str("disabled"),
            RecordStatus::Enabled => f.write_str("enabled"),
            RecordStatus::Unknown(n) => write!(f, "unknown({})", n),
        }
    }
}

impl std::str::FromStr for RecordStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enabled" | "enable" | "1" => Ok(RecordStatus::Enabled),
            "disabled" | "disable" | "0" => Ok(RecordStatus::Disabled),
            other => Err(format!("unknown status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    SuperAdmin,
    OpsAdmin,
    SecurityAdmin,
    #[default]
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_id: String,
    /// Server-defined expiry; informational only, never validated locally.
    #[serde(default)]
    pub expires_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub public_key: String,
    pub status: RecordStatus,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyInfo {
    pub id: String,
    pub user_id: String,
    pub public_key: String,
    pub status: RecordStatus,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: String,
    pub user_id: String,
    pub action: String,
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemStats {
    pub users: u64,
    pub keys: u64,
    pub sessions: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    #[serde(default)]
    pub timestamp: String,
}

/// Co-signing request. Both fields are Base64 blobs the console never
/// interprets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignRequest {
    pub q1: String,
    pub e: String,
}

impl SignRequest {
    pub fn new(q1: impl Into<String>, e: impl Into<String>) -> Self {
        Self {
            q1: q1.into(),
            e: e.into(),
        }
    }

    /// Encode raw blobs with the standard padded Base64 alphabet.
    pub fn from_raw(q1: &[u8], e: &[u8]) -> Self {
        let engine = base64::engine::general_purpose::STANDARD;
        Self {
            q1: engine.encode(q1),
            e: engine.encode(e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignResponse {
    pub r: String,
    pub s2: String,
    pub s3: String,
}

/// Paginated list wrapper used by the management endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    #[serde(default = "Vec::new")]
    pub list: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u64,
    #[serde(default)]
    pub page_size: u64,
}

/// Filters for `GET /mapi/logs`. Absent fields are omitted from the query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogQuery {
    pub user_id: Option<String>,
    pub action: Option<String>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl LogQuery {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(user_id) = &self.user_id {
            pairs.push(("userId".to_string(), user_id.clone()));
        }
        if let Some(action) = &self.action {
            pairs.push(("action".to_string(), action.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            pairs.push(("pageSize".to_string(), page_size.to_string()));
        }
        pairs
    }
}
