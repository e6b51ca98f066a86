//! Database bootstrap: create the target database and the four resource tables when asked to.

use crate::error::AppError;
use crate::settings::DatabaseSettings;
use sqlx::ConnectOptions;
use sqlx::PgPool;

/// Table DDL in foreign-key order. Idempotent.
const SCHEMA_DDL: &[(&str, &str)] = &[
    (
        "projects",
        r#"
        CREATE TABLE IF NOT EXISTS projects (
            id SERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "suppliers",
        r#"
        CREATE TABLE IF NOT EXISTS suppliers (
            id SERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            website TEXT
        )
        "#,
    ),
    (
        "parts",
        r#"
        CREATE TABLE IF NOT EXISTS parts (
            id SERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            supplier_id INTEGER REFERENCES suppliers (id) ON DELETE SET NULL,
            unit_price NUMERIC(12, 2)
        )
        "#,
    ),
    (
        "bom",
        r#"
        CREATE TABLE IF NOT EXISTS bom (
            project_id INTEGER NOT NULL REFERENCES projects (id) ON DELETE CASCADE,
            part_id INTEGER NOT NULL REFERENCES parts (id) ON DELETE RESTRICT,
            quantity INTEGER NOT NULL CHECK (quantity > 0),
            net_price NUMERIC(12, 2),
            PRIMARY KEY (project_id, part_id)
        )
        "#,
    ),
];

/// Create projects, suppliers, parts and bom if they do not exist.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), AppError> {
    for (table, ddl) in SCHEMA_DDL {
        sqlx::query(ddl).execute(pool).await?;
        tracing::debug!(table, "table ensured");
    }
    Ok(())
}

/// Ensure the configured database exists; create it if not. Connects to the maintenance
/// `postgres` database to run CREATE DATABASE. Call before the pool is first used.
pub async fn ensure_database_exists(settings: &DatabaseSettings) -> Result<(), AppError> {
    let db_name = settings.database.as_str();
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let mut conn = settings.admin_connect_options().connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(db_name)))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = db_name, "created database");
    }
    Ok(())
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
