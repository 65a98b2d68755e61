use std::sync::Arc;

use bookmarks_api::app::{app, AppContext};
use bookmarks_api::config::AppConfig;
use bookmarks_api::database;
use bookmarks_api::database::bookmarks::PgBookmarkStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, API_TOKEN, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env()?;
    tracing::info!("Starting bookmarks API in {:?} mode", config.environment);

    let pool = database::connect(&config.database).await?;
    database::bookmarks::ensure_schema(&pool).await?;

    let port = config.server.port;
    let ctx = AppContext {
        config: Arc::new(config),
        store: Arc::new(PgBookmarkStore::new(pool)),
    };

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Bookmarks API listening on http://{}", bind_addr);

    axum::serve(listener, app(ctx)).await?;
    Ok(())
}
