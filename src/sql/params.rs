//! Convert serde_json::Value to the text form bound to PostgreSQL parameters.
//!
//! Every placeholder carries an explicit cast (`$1::int4`), so values travel as text and
//! PostgreSQL does the conversion. Bad input surfaces as a database error.

use serde_json::Value;

/// Text representation of a JSON value for binding. `None` binds SQL NULL.
pub fn bind_text(v: &Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => Some(v.to_string()),
    }
}
