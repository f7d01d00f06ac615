use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::AppState;
use crate::middleware::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
///
/// The recommendation endpoints keep accepting GET with a JSON body for
/// existing clients; POST is the preferred form.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route(
            "/get_recomendations/",
            get(handlers::get_recommendations).post(handlers::get_recommendations),
        )
        // Deprecated request shapes
        .route(
            "/get_recomendations/v1/",
            get(handlers::get_recommendations_v1).post(handlers::get_recommendations_v1),
        )
        .route(
            "/get_recomendations/basic/",
            get(handlers::get_recommendations_basic).post(handlers::get_recommendations_basic),
        )
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
}
