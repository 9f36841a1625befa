//! Axum router configuration with middleware.
//!
//! REST routes live under `/api/v1/`; the chat WebSocket is at `/ws/chat`.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/sessions", get(handlers::session::list_sessions))
        .route(
            "/sessions/{id}",
            axum::routing::delete(handlers::session::end_session),
        )
        .route(
            "/sessions/{id}/messages",
            get(handlers::session::get_messages),
        )
        .route("/agents", get(handlers::agents::get_agents));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/ws/chat", get(handlers::ws::ws_handler))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Simple health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}
