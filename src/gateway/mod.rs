//! Database gateway: the single shared handle every resource router executes statements through.

mod postgres;

pub use postgres::PgGateway;

use crate::error::AppError;
use crate::sql::QueryBuf;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// The three statement shapes used by the routers, plus a liveness check.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Zero or more rows, each decoded into a JSON object keyed by column name.
    async fn fetch_many(&self, q: &QueryBuf) -> Result<Vec<Value>, AppError>;

    /// Exactly one row; no row is `sqlx::Error::RowNotFound`.
    async fn fetch_one(&self, q: &QueryBuf) -> Result<Value, AppError>;

    /// Rows affected.
    async fn execute(&self, q: &QueryBuf) -> Result<u64, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}

pub type SharedGateway = Arc<dyn Gateway>;
