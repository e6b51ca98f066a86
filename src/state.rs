//! Router state. The gateway is built once at startup and handed to each router constructor.

use crate::error::AppError;
use crate::gateway::SharedGateway;
use crate::resources::Resource;
use crate::response;
use crate::settings::ErrorStatusMode;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// State for the root routes (health, readiness).
#[derive(Clone)]
pub struct AppState {
    pub gateway: SharedGateway,
}

/// State for one resource router.
#[derive(Clone)]
pub struct ResourceState {
    pub resource: &'static Resource,
    pub gateway: SharedGateway,
    pub error_status: ErrorStatusMode,
}

impl ResourceState {
    /// Turn an operation result into a response. Failures are logged and answered with
    /// an `{error}` body: status 200 in legacy mode, the classified status in strict mode.
    pub fn respond<T: IntoResponse>(&self, op: &'static str, result: Result<T, AppError>) -> Response {
        match result {
            Ok(r) => r.into_response(),
            Err(e) => {
                tracing::error!(resource = self.resource.path, op, error = %e, "operation failed");
                let status = match self.error_status {
                    ErrorStatusMode::Legacy => StatusCode::OK,
                    ErrorStatusMode::Strict => e.status(),
                };
                response::failure(status, e.to_string()).into_response()
            }
        }
    }
}
