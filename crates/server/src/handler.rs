use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{Method, Uri};
use tracing::debug;

use memstore_protocol::{
    Health, KeyValue, Message, PopRequest, PushRequest, Response, SetRequest, UpdateRequest,
    routes,
};
use memstore_storage::WorkerState;

use crate::app::AppState;
use crate::error::ApiError;

type ApiResult<T> = Result<Json<Response<T>>, ApiError>;

fn parse<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|_| ApiError::bad_request("Invalid JSON payload"))
}

fn require_key(key: &str) -> Result<(), ApiError> {
    if key.is_empty() {
        return Err(ApiError::bad_request("Key is required"));
    }
    Ok(())
}

/// `POST /api/v1/keys`
pub async fn set(
    State(state): State<AppState>,
    payload: Result<Json<SetRequest>, JsonRejection>,
) -> ApiResult<Message> {
    let SetRequest {
        key,
        value,
        ttl_seconds,
    } = parse(payload)?;
    require_key(&key)?;
    if ttl_seconds <= 0 {
        return Err(ApiError::bad_request(
            "TTL is required and must be greater than 0",
        ));
    }

    debug!("SET {key} ttl={ttl_seconds}s");
    state
        .run("set key", move |store| store.set(key, &value, ttl_seconds))
        .await?;
    Ok(Json(Response::ok(Message::new("Key set successfully"))))
}

/// `GET /api/v1/keys/{key}`
pub async fn get(State(state): State<AppState>, Path(key): Path<String>) -> ApiResult<KeyValue> {
    let lookup = key.clone();
    let value = state.run("get key", move |store| store.get(&lookup)).await?;
    Ok(Json(Response::ok(KeyValue { key, value })))
}

/// `PUT /api/v1/keys/{key}`
pub async fn update(
    State(state): State<AppState>,
    Path(key): Path<String>,
    payload: Result<Json<UpdateRequest>, JsonRejection>,
) -> ApiResult<Message> {
    let UpdateRequest { value } = parse(payload)?;

    debug!("UPDATE {key}");
    state
        .run("update key", move |store| store.update(&key, &value))
        .await?;
    Ok(Json(Response::ok(Message::new("Key updated successfully"))))
}

/// `DELETE /api/v1/keys/{key}`
pub async fn remove(State(state): State<AppState>, Path(key): Path<String>) -> ApiResult<Message> {
    debug!("REMOVE {key}");
    state
        .run("remove key", move |store| store.remove(&key))
        .await?;
    Ok(Json(Response::ok(Message::new("Key removed successfully"))))
}

/// `POST /api/v1/lists/push`
pub async fn push(
    State(state): State<AppState>,
    payload: Result<Json<PushRequest>, JsonRejection>,
) -> ApiResult<Message> {
    let PushRequest { key, item } = parse(payload)?;
    require_key(&key)?;

    debug!("PUSH {key}");
    state
        .run("push item", move |store| store.push(&key, &item))
        .await?;
    Ok(Json(Response::ok(Message::new("Item pushed successfully"))))
}

/// `POST /api/v1/lists/pop`
pub async fn pop(
    State(state): State<AppState>,
    payload: Result<Json<PopRequest>, JsonRejection>,
) -> ApiResult<KeyValue> {
    let PopRequest { key } = parse(payload)?;
    require_key(&key)?;

    let lookup = key.clone();
    let value = state.run("pop item", move |store| store.pop(&lookup)).await?;
    Ok(Json(Response::ok(KeyValue { key, value })))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<Response<Health>> {
    let worker = match state.store.expiry_worker_state() {
        WorkerState::Running => "running",
        WorkerState::Stopped => "stopped",
    };

    Json(Response::ok(Health {
        status: "ok".into(),
        keys: state.store.len(),
        expiry_worker: worker.into(),
    }))
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// O wildcard `{*key}` não casa com sufixo vazio: `/api/v1/keys/` cai aqui.
pub async fn not_found(method: Method, uri: Uri) -> ApiError {
    let keys_root = format!("{}/", routes::KEYS);
    if uri.path() != keys_root {
        return ApiError::NotFound;
    }
    match method {
        Method::GET | Method::PUT | Method::DELETE => ApiError::bad_request("Key is required"),
        _ => ApiError::MethodNotAllowed,
    }
}
