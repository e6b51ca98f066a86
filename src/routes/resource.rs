//! Per-resource routes: /all, /get/:key.., /add, /delete/:key..

use crate::gateway::SharedGateway;
use crate::handlers::resource::{add, list, read, remove};
use crate::resources::Resource;
use crate::settings::ErrorStatusMode;
use crate::state::ResourceState;
use axum::{
    routing::{delete, get, post},
    Router,
};

/// "/:project_id/:part_id" for the given key columns.
fn key_path(key: &[&str]) -> String {
    key.iter().map(|k| format!("/:{}", k)).collect()
}

/// Routes for one resource. Composite keys get one GET route per key prefix.
pub fn resource_routes(resource: &'static Resource, gateway: SharedGateway, error_status: ErrorStatusMode) -> Router {
    let mut router = Router::new()
        .route("/all", get(list))
        .route("/add", post(add))
        .route(&format!("/delete{}", key_path(resource.key)), delete(remove));
    for n in 1..=resource.key.len() {
        router = router.route(&format!("/get{}", key_path(&resource.key[..n])), get(read));
    }
    router.with_state(ResourceState {
        resource,
        gateway,
        error_status,
    })
}
