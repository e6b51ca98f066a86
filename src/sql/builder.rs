//! Builds parameterized SELECT, INSERT and DELETE statements from a resource definition.

use crate::resources::{Column, PgType, Resource};
use serde_json::{Map, Value};

/// Quote identifier for PostgreSQL (safe: only from the resource catalog).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SqlOp {
    Select,
    Insert,
    Delete,
}

/// A value bound to the placeholder generated for the column it is named after.
#[derive(Clone, Debug, PartialEq)]
pub struct NamedParam {
    pub name: &'static str,
    pub value: Value,
}

#[derive(Clone, Debug)]
pub struct QueryBuf {
    pub op: SqlOp,
    pub table: &'static str,
    pub sql: String,
    pub params: Vec<NamedParam>,
}

impl QueryBuf {
    fn new(op: SqlOp, table: &'static str) -> Self {
        QueryBuf {
            op,
            table,
            sql: String::new(),
            params: Vec::new(),
        }
    }

    /// Push a named parameter and return its placeholder with the column's cast, e.g. `$2::int4`.
    fn bind(&mut self, column: &Column, value: Value) -> String {
        self.params.push(NamedParam {
            name: column.name,
            value,
        });
        format!("${}::{}", self.params.len(), column.pg_type.sql_name())
    }

    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.iter().find(|p| p.name == name).map(|p| &p.value)
    }

    pub fn param_names(&self) -> Vec<&'static str> {
        self.params.iter().map(|p| p.name).collect()
    }
}

/// SELECT list: explicit columns, numeric as col::text so exact decimals come back as strings.
fn select_column_list(resource: &Resource) -> String {
    resource
        .columns
        .iter()
        .map(|c| {
            let q = quoted(c.name);
            match c.pg_type {
                PgType::Numeric => format!("{}::text", q),
                _ => q,
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn order_by_key(resource: &Resource) -> String {
    resource
        .key
        .iter()
        .map(|k| quoted(k))
        .collect::<Vec<_>>()
        .join(", ")
}

/// WHERE clause over the given key columns. Unknown names are skipped.
fn where_key(q: &mut QueryBuf, resource: &Resource, key: &[(&str, Value)]) -> String {
    let mut parts = Vec::new();
    for (name, value) in key {
        let Some(col) = resource.column(name) else { continue };
        let ph = q.bind(col, value.clone());
        parts.push(format!("{} = {}", quoted(col.name), ph));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", parts.join(" AND "))
    }
}

/// SELECT every row, ordered by key.
pub fn select_all(resource: &Resource) -> QueryBuf {
    let mut q = QueryBuf::new(SqlOp::Select, resource.table);
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY {}",
        select_column_list(resource),
        quoted(resource.table),
        order_by_key(resource)
    );
    q
}

/// SELECT rows matching the key (or a prefix of a composite key).
pub fn select_by_key(resource: &Resource, key: &[(&str, Value)]) -> QueryBuf {
    let mut q = QueryBuf::new(SqlOp::Select, resource.table);
    let where_clause = where_key(&mut q, resource, key);
    q.sql = format!(
        "SELECT {} FROM {}{} ORDER BY {}",
        select_column_list(resource),
        quoted(resource.table),
        where_clause,
        order_by_key(resource)
    );
    q
}

/// INSERT the resource's insertable columns from `body`, returning the key columns.
/// Keys outside the allow-list are ignored; allow-listed keys missing from the body bind NULL.
pub fn insert(resource: &Resource, body: &Map<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new(SqlOp::Insert, resource.table);
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for c in resource.insertable() {
        let val = body.get(c.name).cloned().unwrap_or(Value::Null);
        placeholders.push(q.bind(c, val));
        cols.push(quoted(c.name));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(resource.table),
        cols.join(", "),
        placeholders.join(", "),
        order_by_key(resource)
    );
    q
}

/// DELETE by full key.
pub fn delete_by_key(resource: &Resource, key: &[(&str, Value)]) -> QueryBuf {
    let mut q = QueryBuf::new(SqlOp::Delete, resource.table);
    let mut where_clause = where_key(&mut q, resource, key);
    if where_clause.is_empty() {
        where_clause = " WHERE FALSE".into();
    }
    q.sql = format!("DELETE FROM {}{}", quoted(resource.table), where_clause);
    q
}
