use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use memstore_common::StorageError;
use memstore_protocol::Response as ApiResponse;

/// Erro devolvido pelos handlers HTTP, convertido no envelope JSON.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Not found")]
    NotFound,
    #[error("failed to {action}: {source}")]
    Storage {
        action: &'static str,
        #[source]
        source: StorageError,
    },
    #[error("Request timed out")]
    Timeout,
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    /// Erro do store com o verbo da operação (`"set key"`, `"pop item"`...).
    pub fn storage(action: &'static str) -> impl FnOnce(StorageError) -> Self {
        move |source| ApiError::Storage { action, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Storage { source, .. } => match source {
                StorageError::KeyNotFound => StatusCode::NOT_FOUND,
                StorageError::EmptyList | StorageError::InvalidTtl(_) => StatusCode::BAD_REQUEST,
                StorageError::TypeMismatch => StatusCode::CONFLICT,
                StorageError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Rótulo estável para logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::MethodNotAllowed => "method_not_allowed",
            ApiError::NotFound => "not_found",
            ApiError::Storage { source, .. } => source.kind(),
            ApiError::Timeout => "timeout",
            ApiError::Internal(_) => "internal",
        }
    }

    /// Mensagem exposta ao cliente.
    pub fn message(&self) -> String {
        match self {
            ApiError::Storage { action, source } => match source {
                StorageError::KeyNotFound => "Key not found".into(),
                StorageError::EmptyList => "List is empty".into(),
                other => format!("Failed to {action}: {}", describe(other)),
            },
            other => other.to_string(),
        }
    }
}

/// Descrição em inglês do erro de storage para o wire.
fn describe(err: &StorageError) -> &'static str {
    match err {
        StorageError::KeyNotFound => "key not found",
        StorageError::TypeMismatch => "operation not supported for this data type",
        StorageError::InvalidTtl(_) => "invalid TTL value",
        StorageError::EmptyList => "list is empty",
        StorageError::Serialization(_) => "failed to marshal value to JSON",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(kind = self.kind(), "erro interno na API: {self}");
        }
        let body: ApiResponse = ApiResponse::err(self.message());
        (status, Json(body)).into_response()
    }
}
