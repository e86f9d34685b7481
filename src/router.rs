use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::AppState;

/// Build the application router with all routes
pub fn build(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::healthcheck))
        // Device model catalog
        .route("/api/models", get(handlers::device_models::list_models))
        .route("/api/models/:model/defaults", get(handlers::device_models::get_model_defaults))
        // Template catalog and selection
        .route("/api/templates", get(handlers::templates::list_templates))
        .route("/api/templates/select", get(handlers::templates::preview_selection))
        // Interface derivation
        .route("/api/interfaces", post(handlers::devices::preview_interfaces))
        .route("/api/link-id", get(handlers::devices::preview_link_id))
        // Rendering
        .route("/api/render", post(handlers::configs::render_config))
        .route("/api/render/batch", post(handlers::configs::render_batch))
        // Rendered files
        .route("/configs/:filename", get(handlers::configs::serve_config))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
