use std::path::Path;

use axum::{
    middleware,
    routing::{any, get},
    Router,
};
use tower_http::services::ServeDir;

pub mod api;
pub mod bind;
pub mod root;

/// Builds the router: mock API routes first, a catch-all for everything else
/// under `/api/`, and static files from `content_root` as the fallback.
/// OPTIONS preflight is answered before routing so it covers every path.
pub fn app(content_root: &Path) -> Router {
    Router::new()
        .route("/api/health", get(api::health))
        .route("/api/stocks", get(api::stocks))
        .route("/api/", any(api::not_found))
        .route("/api/{*rest}", any(api::not_found))
        .fallback_service(ServeDir::new(content_root))
        .layer(middleware::from_fn(api::preflight))
}
