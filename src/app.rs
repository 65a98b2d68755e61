use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::database::bookmarks::BookmarkStore;
use crate::handlers;
use crate::middleware::auth::bearer_auth;

/// Process-wide context injected into the router: configuration plus the
/// storage gateway, both substitutable in tests.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn BookmarkStore>,
}

pub fn app(ctx: AppContext) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Bookmark API behind the access gate
        .merge(
            handlers::bookmarks::routes()
                .route_layer(axum::middleware::from_fn_with_state(ctx.clone(), bearer_auth)),
        )
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "bookmarks-api",
        "version": version,
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "bookmarks": "/bookmarks[/:id] (protected)",
        }
    }))
}

async fn health(State(ctx): State<AppContext>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match ctx.store.ping().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
