//! Response bodies shared by all resource routes.

use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::Value;

/// `{ "error": "<message>" }`
#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        ErrorBody { error: message.into() }
    }
}

/// `{ "id": <rows affected> }` returned by delete.
#[derive(Serialize, Debug)]
pub struct Affected {
    pub id: u64,
}

pub fn rows(data: Vec<Value>) -> (StatusCode, Json<Vec<Value>>) {
    (StatusCode::OK, Json(data))
}

/// The key row returned by INSERT ... RETURNING.
pub fn created(key: Value) -> (StatusCode, Json<Value>) {
    (StatusCode::CREATED, Json(key))
}

pub fn affected(count: u64) -> (StatusCode, Json<Affected>) {
    (StatusCode::OK, Json(Affected { id: count }))
}

pub fn failure(status: StatusCode, message: String) -> (StatusCode, Json<ErrorBody>) {
    (status, Json(ErrorBody::new(message)))
}
