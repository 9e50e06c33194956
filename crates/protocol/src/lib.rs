#![forbid(unsafe_code)]

//! Modelos JSON trocados entre o servidor HTTP e o cliente remoto.

mod request;
mod response;

pub use request::{PopRequest, PushRequest, SetRequest, UpdateRequest};
pub use response::{Health, KeyValue, Message, Response};

/// Rotas da API v1.
pub mod routes {
    pub const KEYS: &str = "/api/v1/keys";
    pub const LIST_PUSH: &str = "/api/v1/lists/push";
    pub const LIST_POP: &str = "/api/v1/lists/pop";
    pub const HEALTH: &str = "/health";
}
