//! # memstore client
//!
//! Cliente async para a API HTTP do memstore.
//!
//! ```rust,no_run
//! use memstore_client::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), memstore_client::ClientError> {
//!     let client = Client::new("http://localhost:8080")?;
//!
//!     // String com TTL de 1 hora
//!     client.set("user:123", "John Doe", 3600).await?;
//!     assert_eq!(client.get("user:123").await?, "John Doe");
//!
//!     // Listas são pilhas: o último push é o primeiro pop
//!     client.push("tasks", "process-order").await?;
//!     let item = client.pop("tasks").await?;
//!     println!("{item}");
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]

mod error;

pub use error::ClientError;

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use memstore_common::DEFAULT_CLIENT_TIMEOUT;
use memstore_protocol::{
    Health, KeyValue, Message, PopRequest, PushRequest, Response, SetRequest, UpdateRequest,
    routes,
};

pub type ClientResult<T> = Result<T, ClientError>;

/// Cliente da API HTTP.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    /// `base_url` aponta para o servidor, ex.: `http://localhost:8080`.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Self::with_timeout(base_url, DEFAULT_CLIENT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Grava `value` com TTL em segundos (0 = sem expiração).
    ///
    /// O servidor HTTP exige TTL > 0; o cliente só rejeita localmente TTL
    /// negativo.
    pub async fn set<T>(&self, key: &str, value: &T, ttl_seconds: i64) -> ClientResult<()>
    where
        T: Serialize + ?Sized,
    {
        if ttl_seconds < 0 {
            return Err(ClientError::InvalidTtl(ttl_seconds));
        }
        let body = SetRequest {
            key: key.to_string(),
            value: to_json(value)?,
            ttl_seconds,
        };
        let builder = self.http.post(self.endpoint(routes::KEYS, None)).json(&body);
        self.send::<Message>(builder).await.map(drop)
    }

    pub async fn get(&self, key: &str) -> ClientResult<String> {
        let builder = self.http.get(self.endpoint(routes::KEYS, Some(key)));
        let data: KeyValue = self.send(builder).await?;
        Ok(data.value)
    }

    /// Troca o valor de uma chave existente; o TTL original é mantido.
    pub async fn update<T>(&self, key: &str, value: &T) -> ClientResult<()>
    where
        T: Serialize + ?Sized,
    {
        let body = UpdateRequest {
            value: to_json(value)?,
        };
        let builder = self
            .http
            .put(self.endpoint(routes::KEYS, Some(key)))
            .json(&body);
        self.send::<Message>(builder).await.map(drop)
    }

    pub async fn remove(&self, key: &str) -> ClientResult<()> {
        let builder = self
            .http
            .request(Method::DELETE, self.endpoint(routes::KEYS, Some(key)));
        self.send::<Message>(builder).await.map(drop)
    }

    /// Insere `item` na frente da lista, criando-a se não existir.
    pub async fn push<T>(&self, key: &str, item: &T) -> ClientResult<()>
    where
        T: Serialize + ?Sized,
    {
        let body = PushRequest {
            key: key.to_string(),
            item: to_json(item)?,
        };
        let builder = self
            .http
            .post(self.endpoint(routes::LIST_PUSH, None))
            .json(&body);
        self.send::<Message>(builder).await.map(drop)
    }

    /// Remove e retorna o item da frente da lista.
    pub async fn pop(&self, key: &str) -> ClientResult<String> {
        let body = PopRequest {
            key: key.to_string(),
        };
        let builder = self
            .http
            .post(self.endpoint(routes::LIST_POP, None))
            .json(&body);
        let data: KeyValue = self.send(builder).await?;
        Ok(data.value)
    }

    pub async fn health(&self) -> ClientResult<Health> {
        let builder = self.http.get(self.endpoint(routes::HEALTH, None));
        self.send(builder).await
    }

    /// Monta a URL da rota; a chave vira um único segmento percent-encoded.
    fn endpoint(&self, route: &str, key: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(route.split('/').filter(|s| !s.is_empty()));
            if let Some(key) = key {
                segments.push(key);
            }
        }
        url
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let resp = builder.send().await?;
        let status = resp.status();
        debug!("{} {}", status.as_u16(), resp.url());

        let body: Response<T> = resp
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        if !body.success {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: body.error.unwrap_or_default(),
            });
        }
        body.data
            .ok_or_else(|| ClientError::InvalidResponse("missing data field".into()))
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> ClientResult<serde_json::Value> {
    serde_json::to_value(value).map_err(ClientError::Serialization)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_route() {
        let client = Client::new("http://localhost:8080").unwrap();
        assert_eq!(
            client.endpoint(routes::LIST_PUSH, None).as_str(),
            "http://localhost:8080/api/v1/lists/push"
        );
    }

    #[test]
    fn endpoint_encodes_key() {
        let client = Client::new("http://localhost:8080/").unwrap();
        assert_eq!(
            client.endpoint(routes::KEYS, Some("user:1/a b")).as_str(),
            "http://localhost:8080/api/v1/keys/user:1%2Fa%20b"
        );
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let client = Client::new("http://proxy.local/memstore").unwrap();
        assert_eq!(
            client.endpoint(routes::HEALTH, None).as_str(),
            "http://proxy.local/memstore/health"
        );
    }

    #[test]
    fn rejects_invalid_url() {
        assert!(matches!(
            Client::new("not a url"),
            Err(ClientError::InvalidUrl(_))
        ));
        assert!(matches!(
            Client::new("mailto:someone@example.com"),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn negative_ttl_is_rejected_locally() {
        let client = Client::new("http://127.0.0.1:9").unwrap();
        assert!(matches!(
            client.set("k", "v", -1).await,
            Err(ClientError::InvalidTtl(-1))
        ));
    }
}
