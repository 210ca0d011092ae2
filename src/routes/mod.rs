use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{pages, upload};
use crate::state::AppState;

/// Create the application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/", get(pages::index))
        .route("/upload", post(upload::upload))
        .route("/result/{text}", get(pages::show_result))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(TraceLayer::new_for_http());

    if let Some(origins) = &state.config.cors_allowed_origins {
        let cors = if origins == "*" {
            CorsLayer::new().allow_origin(Any).allow_methods(Any)
        } else {
            let origins: Vec<http::HeaderValue> = origins
                .split(',')
                .filter_map(|origin| origin.trim().parse().ok())
                .collect();
            CorsLayer::new().allow_origin(origins).allow_methods(Any)
        };
        router = router.layer(cors);
    }

    router.with_state(state)
}
