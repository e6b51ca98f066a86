//! Shared test fixtures: an in-memory gateway and request helpers.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use bom_server::resources::{PgType, Resource};
use bom_server::sql::{bind_text, QueryBuf, SqlOp};
use bom_server::{build_app, catalog, AppError, Gateway, Settings};
use http_body_util::BodyExt;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

fn db_error(msg: String) -> AppError {
    AppError::Db(sqlx::Error::Protocol(msg))
}

/// NOT NULL columns per table, mirroring the schema DDL.
fn not_null(table: &str) -> &'static [&'static str] {
    match table {
        "suppliers" | "parts" | "projects" => &["name"],
        "bom" => &["project_id", "part_id", "quantity"],
        _ => &[],
    }
}

/// Coerce bound text the way PostgreSQL's cast would, or fail like it.
fn cast(pg_type: PgType, value: &Value) -> Result<Value, AppError> {
    let Some(text) = bind_text(value) else { return Ok(Value::Null) };
    match pg_type {
        PgType::Int4 => text
            .trim()
            .parse::<i32>()
            .map(|n| Value::Number(n.into()))
            .map_err(|_| db_error(format!("invalid input syntax for type integer: \"{}\"", text))),
        PgType::Numeric => text
            .trim()
            .parse::<f64>()
            .map(|_| Value::String(text.trim().to_string()))
            .map_err(|_| db_error(format!("invalid input syntax for type numeric: \"{}\"", text))),
        PgType::Text | PgType::Timestamptz => Ok(Value::String(text)),
    }
}

/// Gateway that executes built statements against in-memory tables.
#[derive(Default)]
pub struct MemoryGateway {
    tables: Mutex<HashMap<&'static str, Vec<Map<String, Value>>>>,
    next_id: Mutex<i64>,
    /// Every statement received, for asserting on bound parameters.
    pub executed: Mutex<Vec<QueryBuf>>,
    pub down: bool,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        MemoryGateway {
            down: true,
            ..Self::default()
        }
    }

    pub fn last_query(&self) -> Option<QueryBuf> {
        self.executed.lock().unwrap().last().cloned()
    }

    fn resource(table: &str) -> &'static Resource {
        catalog()
            .into_iter()
            .find(|r| r.table == table)
            .expect("query for a catalog table")
    }

    fn check_up(&self) -> Result<(), AppError> {
        if self.down {
            return Err(AppError::Db(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    /// Typed key filter from the statement's parameters.
    fn filter(q: &QueryBuf) -> Result<Vec<(&'static str, Value)>, AppError> {
        let resource = Self::resource(q.table);
        q.params
            .iter()
            .map(|p| -> Result<(&'static str, Value), AppError> {
                let col = resource.column(p.name).expect("bound column exists");
                Ok((p.name, cast(col.pg_type, &p.value)?))
            })
            .collect()
    }

    fn matches(row: &Map<String, Value>, filter: &[(&str, Value)]) -> bool {
        filter.iter().all(|(k, v)| row.get(*k) == Some(v))
    }

    fn select(&self, q: &QueryBuf) -> Result<Vec<Value>, AppError> {
        let filter = Self::filter(q)?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .get(q.table)
            .map(|rows| {
                rows.iter()
                    .filter(|r| Self::matches(r, &filter))
                    .cloned()
                    .map(Value::Object)
                    .collect()
            })
            .unwrap_or_default())
    }

    fn insert(&self, q: &QueryBuf) -> Result<Value, AppError> {
        let resource = Self::resource(q.table);
        let mut row = Map::new();
        for p in &q.params {
            let col = resource.column(p.name).expect("bound column exists");
            row.insert(p.name.to_string(), cast(col.pg_type, &p.value)?);
        }
        for col in not_null(q.table) {
            if row.get(*col).map_or(true, Value::is_null) {
                return Err(db_error(format!(
                    "null value in column \"{}\" of relation \"{}\" violates not-null constraint",
                    col, q.table
                )));
            }
        }
        if resource.key == ["id"] {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            row.insert("id".into(), Value::Number((*next).into()));
        }
        for col in resource.columns {
            row.entry(col.name.to_string()).or_insert(match col.pg_type {
                PgType::Timestamptz => Value::String("2026-01-01T00:00:00+00:00".into()),
                _ => Value::Null,
            });
        }

        let mut tables = self.tables.lock().unwrap();
        let rows = tables.entry(q.table).or_default();
        let key: Vec<(&str, Value)> = resource
            .key
            .iter()
            .map(|k| (*k, row.get(*k).cloned().unwrap_or(Value::Null)))
            .collect();
        if rows.iter().any(|r| Self::matches(r, &key)) {
            return Err(db_error(format!(
                "duplicate key value violates unique constraint \"{}_pkey\"",
                q.table
            )));
        }
        rows.push(row);
        Ok(Value::Object(
            key.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        ))
    }

    fn delete(&self, q: &QueryBuf) -> Result<u64, AppError> {
        let filter = Self::filter(q)?;
        let mut tables = self.tables.lock().unwrap();
        let Some(rows) = tables.get_mut(q.table) else { return Ok(0) };
        let before = rows.len();
        rows.retain(|r| !Self::matches(r, &filter));
        Ok((before - rows.len()) as u64)
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn fetch_many(&self, q: &QueryBuf) -> Result<Vec<Value>, AppError> {
        self.check_up()?;
        self.executed.lock().unwrap().push(q.clone());
        match q.op {
            SqlOp::Select => self.select(q),
            SqlOp::Insert => Ok(vec![self.insert(q)?]),
            SqlOp::Delete => Ok(Vec::new()),
        }
    }

    async fn fetch_one(&self, q: &QueryBuf) -> Result<Value, AppError> {
        self.check_up()?;
        self.executed.lock().unwrap().push(q.clone());
        match q.op {
            SqlOp::Insert => self.insert(q),
            _ => self
                .select(q)?
                .into_iter()
                .next()
                .ok_or(AppError::Db(sqlx::Error::RowNotFound)),
        }
    }

    async fn execute(&self, q: &QueryBuf) -> Result<u64, AppError> {
        self.check_up()?;
        self.executed.lock().unwrap().push(q.clone());
        match q.op {
            SqlOp::Delete => self.delete(q),
            SqlOp::Insert => self.insert(q).map(|_| 1),
            SqlOp::Select => Ok(self.select(q)?.len() as u64),
        }
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check_up()
    }
}

pub fn settings(pairs: &[(&str, &str)]) -> Settings {
    let env: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Settings::from_lookup(|k| env.get(k).cloned()).unwrap()
}

pub fn app_with(settings: &Settings, gateway: Arc<MemoryGateway>) -> Router {
    build_app(settings, gateway)
}

pub fn app() -> (Router, Arc<MemoryGateway>) {
    let gateway = Arc::new(MemoryGateway::new());
    (app_with(&settings(&[]), gateway.clone()), gateway)
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::delete(uri).body(Body::empty()).unwrap()).await
}
