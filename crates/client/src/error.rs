use thiserror::Error;

/// Erros do cliente remoto.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Falha de transporte (conexão, timeout, TLS...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// O servidor respondeu com `success: false`
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("invalid base URL: {0}")]
    InvalidUrl(String),

    #[error("TTL must be >= 0 (0 = no expiration), got {0}")]
    InvalidTtl(i64),

    #[error("serialization error: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. })
    }

    pub fn is_empty_list(&self) -> bool {
        matches!(self, ClientError::Api { status: 400, message } if message == "List is empty")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_helper() {
        let err = ClientError::Api {
            status: 404,
            message: "Key not found".into(),
        };
        assert!(err.is_not_found());
        assert!(!err.is_empty_list());
        assert_eq!(err.to_string(), "API error (404): Key not found");
    }

    #[test]
    fn empty_list_helper() {
        let err = ClientError::Api {
            status: 400,
            message: "List is empty".into(),
        };
        assert!(err.is_empty_list());

        let other = ClientError::Api {
            status: 400,
            message: "Key is required".into(),
        };
        assert!(!other.is_empty_list());
    }
}
