use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::{request_tracing, ServerState};

use super::handlers::{analyze, health, search, stats};

pub struct AppRouter;

impl AppRouter {
    pub fn create(state: ServerState) -> Router {
        Router::new()
            .route("/", get(|| async { "Mailsense server" }))
            .route("/health", get(health::health_check))
            .route("/analyze", post(analyze::analyze_email))
            .route(
                "/analysis/:mailbox/:email_id",
                get(analyze::get_analysis),
            )
            .route("/stats", get(stats::get_stats))
            .route("/search", get(search::search))
            .route(
                "/conversations/:conversation_id",
                get(stats::get_conversation),
            )
            .layer(request_tracing::trace_layer())
            .layer(request_tracing::propagate_request_id_layer())
            .layer(request_tracing::set_request_id_layer())
            .layer(CorsLayer::permissive())
            .with_state(state)
            .fallback(handler_404)
    }
}

pub async fn handler_404() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Route does not exist")
}
