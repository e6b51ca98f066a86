//! HTTP handlers for the resource routers.

pub mod resource;
