//! Resource handlers: list, get by key, add, delete by key. One statement each.

use crate::error::AppError;
use crate::resources::Resource;
use crate::response;
use crate::sql::{delete_by_key, insert, select_all, select_by_key};
use crate::state::ResourceState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Response,
    Json,
};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Key columns taken from the path, in key order, stopping at the first one absent.
fn key_from_path<'a>(resource: &'a Resource, params: &HashMap<String, String>) -> Vec<(&'a str, Value)> {
    resource
        .key
        .iter()
        .map_while(|k| params.get(*k).map(|v| (*k, Value::String(v.clone()))))
        .collect()
}

fn body_to_map(body: Result<Json<Value>, JsonRejection>) -> Result<Map<String, Value>, AppError> {
    match body {
        Ok(Json(Value::Object(m))) => Ok(m),
        Ok(_) => Err(AppError::BadRequest("body must be a JSON object".into())),
        Err(rejection) => Err(AppError::BadRequest(rejection.body_text())),
    }
}

/// GET /all
pub async fn list(State(state): State<ResourceState>) -> Response {
    let q = select_all(state.resource);
    let result = state.gateway.fetch_many(&q).await.map(response::rows);
    state.respond("list", result)
}

/// GET /get/:id (or a key prefix for composite keys). Always an array.
pub async fn read(
    State(state): State<ResourceState>,
    Path(params): Path<HashMap<String, String>>,
) -> Response {
    let key = key_from_path(state.resource, &params);
    let q = select_by_key(state.resource, &key);
    let result = state.gateway.fetch_many(&q).await.map(response::rows);
    state.respond("get", result)
}

/// POST /add. Responds 201 with the generated key.
pub async fn add(State(state): State<ResourceState>, body: Result<Json<Value>, JsonRejection>) -> Response {
    let result = async {
        let body = body_to_map(body)?;
        let q = insert(state.resource, &body);
        state.gateway.fetch_one(&q).await
    }
    .await
    .map(response::created);
    state.respond("add", result)
}

/// DELETE /delete/:id. Only routed with the full key; responds with the number of rows removed.
pub async fn remove(
    State(state): State<ResourceState>,
    Path(params): Path<HashMap<String, String>>,
) -> Response {
    let key = key_from_path(state.resource, &params);
    let q = delete_by_key(state.resource, &key);
    let result = state.gateway.execute(&q).await.map(response::affected);
    state.respond("delete", result)
}
