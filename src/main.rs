//! bom-server binary: load settings, build the pool once, serve.

use bom_server::{build_app, ensure_database_exists, ensure_schema, PgGateway, Settings};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bom_server=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let gateway = PgGateway::connect_lazy(&settings.database);

    if settings.ensure_schema {
        ensure_database_exists(&settings.database).await?;
        ensure_schema(gateway.pool()).await?;
        tracing::info!("schema ensured");
    }

    let app = build_app(&settings, Arc::new(gateway));

    let listener = TcpListener::bind(settings.listen_addr()).await?;
    tracing::info!(
        "server started at http://{} (base path '{}')",
        listener.local_addr()?,
        settings.base_path
    );
    axum::serve(listener, app).await?;
    Ok(())
}
