use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Corpo de `POST /api/v1/keys`.
///
/// Campos ausentes assumem o default: `value` vira `null` e `ttl_seconds`
/// vira `0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetRequest {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub ttl_seconds: i64,
}

/// Corpo de `PUT /api/v1/keys/{key}`. A chave vem do path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRequest {
    #[serde(default)]
    pub value: Value,
}

/// Corpo de `POST /api/v1/lists/push`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushRequest {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub item: Value,
}

/// Corpo de `POST /api/v1/lists/pop`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopRequest {
    #[serde(default)]
    pub key: String,
}
