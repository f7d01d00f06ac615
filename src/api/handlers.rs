use axum::{extract::State, http::StatusCode, Extension, Json};
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::middleware::RequestId;
use crate::models::{
    BasicRecommendationRequest, BasicRecommendations, RadiusPolicy, RecommendationRequest,
    Recommendations, V1RecommendationRequest,
};
use crate::services::{recommend, recommend_basic};

use super::AppState;

/// Service identity
pub async fn root() -> Json<Value> {
    Json(json!({
        "Message": "DataPulse Analytics",
        "Documentation": "/docs",
    }))
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Ranked recommendations for the current request contract
pub async fn get_recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<Recommendations>> {
    tracing::info!(
        request_id = %request_id,
        estado = %request.estado,
        ciudad = %request.ciudad,
        km = request.km,
        "Processing recommendation request"
    );

    let response = recommend(state.context.clone(), request, RadiusPolicy::Banded).await?;

    tracing::info!(
        request_id = %request_id,
        returned = response.recomendations.len(),
        "Recommendations returned"
    );

    Ok(Json(response))
}

/// Deprecated v1 contract: no filters, any positive radius
pub async fn get_recommendations_v1(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<V1RecommendationRequest>,
) -> AppResult<Json<Recommendations>> {
    tracing::info!(
        request_id = %request_id,
        estado = %request.estado,
        ciudad = %request.ciudad,
        km = request.km,
        "Processing deprecated v1 recommendation request"
    );

    let response = recommend(
        state.context.clone(),
        RecommendationRequest::from(request),
        RadiusPolicy::Positive,
    )
    .await?;

    Ok(Json(response))
}

/// Deprecated English contract: whole state, optional single category
pub async fn get_recommendations_basic(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<BasicRecommendationRequest>,
) -> AppResult<Json<BasicRecommendations>> {
    tracing::info!(
        request_id = %request_id,
        state = %request.state,
        top_n = request.top_n,
        "Processing deprecated basic recommendation request"
    );

    let response = recommend_basic(state.context.clone(), request).await?;
    Ok(Json(response))
}
