use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope padrão de todas as respostas da API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response<T = Value> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Response<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Payload de confirmação das operações de escrita.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Payload de `GET /api/v1/keys/{key}` e de `POST /api/v1/lists/pop`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

/// Payload de `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub keys: usize,
    pub expiry_worker: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ok_omits_error() {
        let resp = Response::ok(Message::new("Key set successfully"));
        let encoded = serde_json::to_value(&resp).unwrap();
        assert_eq!(
            encoded,
            json!({"success": true, "data": {"message": "Key set successfully"}})
        );
    }

    #[test]
    fn err_omits_data() {
        let resp: Response<KeyValue> = Response::err("Key not found");
        let encoded = serde_json::to_value(&resp).unwrap();
        assert_eq!(encoded, json!({"success": false, "error": "Key not found"}));
    }

    #[test]
    fn decode_typed_data() {
        let raw = r#"{"success":true,"data":{"key":"k","value":"{\"a\":1}"}}"#;
        let resp: Response<KeyValue> = serde_json::from_str(raw).unwrap();
        assert!(resp.success);
        assert_eq!(resp.data.unwrap().value, r#"{"a":1}"#);
    }

    #[test]
    fn decode_error_without_data() {
        let raw = r#"{"success":false,"error":"List is empty"}"#;
        let resp: Response<KeyValue> = serde_json::from_str(raw).unwrap();
        assert!(!resp.success);
        assert!(resp.data.is_none());
        assert_eq!(resp.error.as_deref(), Some("List is empty"));
    }

    #[test]
    fn typed_envelopes_decode_without_default_payload() {
        fn decodable<T: serde::de::DeserializeOwned>() {}
        decodable::<Response<Message>>();
        decodable::<Response<KeyValue>>();
        decodable::<Response<Health>>();

        let raw = r#"{"success":true,"data":{"status":"ok","keys":3,"expiry_worker":"running"}}"#;
        let resp: Response<Health> = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.data.unwrap().keys, 3);
        assert!(resp.error.is_none());
    }
}
