//! Axum router configuration with middleware.
//!
//! All API routes are under `/api/v1/`. Middleware: CORS, tracing.
//! Bot profile pictures are served statically from the picture bucket at
//! `/files/` so `profile_pic_url` values resolve without auth.

use axum::Router;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use botique_core::storage::PICTURE_BUCKET;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let picture_dir = state.blob_store.bucket_dir(PICTURE_BUCKET);

    let api_routes = Router::new()
        // Bot CRUD
        .route("/bots", post(handlers::bot::create_bot))
        .route("/bots", get(handlers::bot::list_bots))
        .route("/bots/{id}", get(handlers::bot::get_bot))
        .route("/bots/{id}", delete(handlers::bot::delete_bot))
        // Uploads (file list grows during creation)
        .route("/bots/{id}/picture", post(handlers::bot::upload_picture))
        .route("/bots/{id}/knowledge", post(handlers::bot::upload_knowledge))
        // Chat sessions
        .route("/bots/{id}/sessions", post(handlers::chat::create_session))
        .route(
            "/sessions/{id}/messages",
            post(handlers::chat::send_message).get(handlers::chat::get_messages),
        )
        .route("/sessions/{id}", delete(handlers::chat::discard_session))
        // Subscriptions + billing
        .route(
            "/subscriptions",
            get(handlers::subscription::list_subscriptions),
        )
        .route(
            "/billing/checkout",
            post(handlers::subscription::create_checkout),
        )
        .route(
            "/webhooks/billing",
            post(handlers::webhook::billing_webhook),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .nest_service("/files", ServeDir::new(picture_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
