//! bom-server: REST backend for projects, parts, suppliers and bills of materials on PostgreSQL.

pub mod error;
pub mod gateway;
pub mod handlers;
pub mod resources;
pub mod response;
pub mod routes;
pub mod settings;
pub mod sql;
pub mod state;
pub mod store;

pub use error::{AppError, ConfigError};
pub use gateway::{Gateway, PgGateway, SharedGateway};
pub use resources::{catalog, Resource};
pub use routes::build_app;
pub use settings::{ErrorStatusMode, Settings};
pub use state::{AppState, ResourceState};
pub use store::{ensure_database_exists, ensure_schema};
