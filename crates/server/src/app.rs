use std::future::Future;
use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tracing::info;

use memstore_common::{DEFAULT_REQUEST_TIMEOUT, StorageResult};
use memstore_protocol::routes;
use memstore_storage::Store;

use crate::error::ApiError;
use crate::handler;

/// Estado compartilhado entre os handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    /// Deadline de cada chamada ao store.
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Executa uma operação do store fora do runtime async, com deadline.
    pub(crate) async fn run<T, F>(&self, action: &'static str, op: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Store) -> StorageResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();
        let task = tokio::task::spawn_blocking(move || op(&store));

        match tokio::time::timeout(self.request_timeout, task).await {
            Ok(Ok(result)) => result.map_err(ApiError::storage(action)),
            Ok(Err(e)) => Err(ApiError::Internal(format!("Failed to {action}: {e}"))),
            Err(_) => Err(ApiError::Timeout),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            routes::KEYS,
            post(handler::set).fallback(handler::method_not_allowed),
        )
        .route(
            &format!("{}/{{*key}}", routes::KEYS),
            get(handler::get)
                .put(handler::update)
                .delete(handler::remove)
                .fallback(handler::method_not_allowed),
        )
        .route(
            routes::LIST_PUSH,
            post(handler::push).fallback(handler::method_not_allowed),
        )
        .route(
            routes::LIST_POP,
            post(handler::pop).fallback(handler::method_not_allowed),
        )
        .route(routes::HEALTH, get(handler::health))
        .fallback(handler::not_found)
        .with_state(state)
}

/// Serve a API no listener até `shutdown` completar.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!("memstore escutando em {addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
