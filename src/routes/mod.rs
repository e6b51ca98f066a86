//! Application shell: resource routers under the base path, health and version at the root,
//! request logging, body limit, panic catcher and a JSON 404 fallback.

mod resource;

pub use resource::resource_routes;

use crate::gateway::SharedGateway;
use crate::resources::catalog;
use crate::response::ErrorBody;
use crate::settings::Settings;
use crate::state::AppState;
use axum::{
    extract::{DefaultBodyLimit, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::any::Any;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

/// Larger bodies fail JSON extraction and are reported like any other failed operation.
const BODY_LIMIT: usize = 1024 * 1024;

#[derive(Serialize)]
struct StatusBody {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<&'static str>,
}

#[derive(Serialize)]
struct Version {
    name: &'static str,
    version: &'static str,
}

async fn health() -> Json<StatusBody> {
    Json(StatusBody {
        status: "ok",
        database: None,
    })
}

/// 503 while the gateway cannot reach the database.
async fn ready(State(state): State<AppState>) -> (StatusCode, Json<StatusBody>) {
    match state.gateway.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(StatusBody {
                status: "ok",
                database: Some("ok"),
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(StatusBody {
                    status: "degraded",
                    database: Some("unavailable"),
                }),
            )
        }
    }
}

async fn version() -> Json<Version> {
    Json(Version {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /health, GET /ready, GET /version. Mounted at the root, outside the base path.
pub fn status_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .with_state(state)
}

/// Build the full application router around an already constructed gateway.
pub fn build_app(settings: &Settings, gateway: SharedGateway) -> Router {
    let mut api = Router::new();
    for resource in catalog() {
        api = api.nest(
            &format!("/{}", resource.path),
            resource_routes(resource, gateway.clone(), settings.error_status),
        );
    }

    let app = status_routes(AppState { gateway });
    let app = if settings.base_path.is_empty() {
        app.merge(api)
    } else {
        app.nest(&settings.base_path, api)
    };

    let development = settings.is_development();
    app.fallback(not_found)
        .layer(middleware::from_fn(log_request))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(CatchPanicLayer::custom(move |err: Box<dyn Any + Send + 'static>| {
            panic_response(err, development)
        }))
        .layer(TraceLayer::new_for_http())
}

async fn log_request(request: Request, next: Next) -> Response {
    tracing::info!(method = %request.method(), path = %request.uri().path(), "request");
    next.run(request).await
}

async fn not_found() -> (StatusCode, Json<ErrorBody>) {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new("not found")))
}

/// 500 for a panicking handler. The panic message is exposed only in development.
fn panic_response(err: Box<dyn Any + Send + 'static>, development: bool) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(panic = %detail, "handler panicked");
    let message = if development {
        detail
    } else {
        "internal server error".to_string()
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody::new(message))).into_response()
}
