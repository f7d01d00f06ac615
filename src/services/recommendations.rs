use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;

use crate::{
    data::RecommenderContext,
    error::{AppError, AppResult},
    models::{
        BasicRecommendation, BasicRecommendationRequest, BusinessRecord, Candidate, RadiusPolicy,
        Recommendation, RecommendationRequest, Recommendations, BasicRecommendations,
    },
    services::{
        filtering::{
            filter_by_category, filter_by_distance, filter_by_features, filter_by_region,
            filter_by_state, resolve_origin,
        },
        scoring::score_and_rank,
        validation::{validate_basic_request, validate_request},
    },
};

/// Lifecycle of a single recommendation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Validated,
    Filtered,
    Scored,
    Responded,
    Rejected,
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Received => "received",
            Stage::Validated => "validated",
            Stage::Filtered => "filtered",
            Stage::Scored => "scored",
            Stage::Responded => "responded",
            Stage::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// Tracks and logs stage transitions for one request
#[derive(Debug)]
struct Pipeline {
    stage: Stage,
}

impl Pipeline {
    fn start() -> Self {
        tracing::debug!(stage = %Stage::Received, "Recommendation request received");
        Self {
            stage: Stage::Received,
        }
    }

    fn advance(&mut self, next: Stage) {
        tracing::debug!(from = %self.stage, to = %next, "Pipeline transition");
        self.stage = next;
    }

    /// Moves to the terminal state and hands the error back for propagation
    fn reject(&mut self, err: AppError) -> AppError {
        match &err {
            AppError::Validation(field) => {
                tracing::info!(from = %self.stage, field = %field, "Request rejected")
            }
            other => tracing::info!(from = %self.stage, reason = %other, "Request rejected"),
        }
        self.stage = Stage::Rejected;
        err
    }
}

/// Runs the scorer off the async runtime under the configured timeout.
///
/// Returns `None` when the timeout fires.
async fn score_with_timeout(
    ctx: Arc<RecommenderContext>,
    user_index: u32,
    candidate_ids: Vec<u32>,
    top_n: usize,
) -> AppResult<Option<Vec<u32>>> {
    let timeout = ctx.settings.scoring_timeout;
    let backend = ctx.scorer.name();
    let candidates = candidate_ids.len();

    let task = tokio::task::spawn_blocking(move || {
        score_and_rank(
            ctx.scorer.as_ref(),
            &ctx.features,
            user_index,
            &candidate_ids,
            top_n,
        )
    });

    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(ranked)) => ranked.map(Some),
        Ok(Err(join_err)) => Err(AppError::Internal(format!("scoring task failed: {}", join_err))),
        Err(_) => {
            tracing::warn!(
                backend,
                candidates,
                timeout_ms = timeout.as_millis() as u64,
                "Scoring timed out, returning empty recommendations"
            );
            Ok(None)
        }
    }
}

/// Produces ranked recommendations for a canonical request
///
/// Validation → category, feature, region and distance filters → scoring →
/// response shaping. Distances are measured from the requested city's
/// centroid, including for businesses in neighboring states.
pub async fn recommend(
    ctx: Arc<RecommenderContext>,
    request: RecommendationRequest,
    policy: RadiusPolicy,
) -> AppResult<Recommendations> {
    let mut pipeline = Pipeline::start();

    let validated = validate_request(
        &request,
        policy,
        &ctx.catalog,
        &ctx.users,
        ctx.settings.top_n,
    )
    .map_err(|field| pipeline.reject(AppError::Validation(field)))?;
    pipeline.advance(Stage::Validated);

    if ctx.users.is_sentinel(&validated.user_id) {
        tracing::debug!("Scoring for the sentinel user");
    }

    let catalog: Vec<&BusinessRecord> = ctx.catalog.records().iter().collect();
    let by_category = filter_by_category(catalog, &validated.categories, &ctx.categories);
    let by_features = filter_by_features(by_category, &validated.features);
    let by_region = filter_by_region(by_features, validated.state);

    let origin = resolve_origin(&ctx.coordinates, validated.state, &validated.city)
        .map_err(|e| pipeline.reject(e))?;
    let candidates = filter_by_distance(
        by_region,
        origin.latitude,
        origin.longitude,
        validated.radius_km,
    );

    if candidates.is_empty() {
        return Err(pipeline.reject(AppError::EmptyCandidateSet));
    }
    pipeline.advance(Stage::Filtered);

    tracing::info!(
        state = %validated.state,
        city = %validated.city,
        radius_km = validated.radius_km,
        categories = validated.categories.len(),
        features = validated.features.len(),
        candidates = candidates.len(),
        "Candidates filtered"
    );

    let candidate_ids: Vec<u32> = candidates.iter().map(|c| c.business.business_int_id).collect();
    let ranked = score_with_timeout(ctx.clone(), validated.user_index, candidate_ids, validated.top_n)
        .await
        .map_err(|e| pipeline.reject(e))?;
    pipeline.advance(Stage::Scored);

    let Some(ranked) = ranked else {
        pipeline.advance(Stage::Responded);
        return Ok(Recommendations::default());
    };

    let by_int_id: HashMap<u32, &Candidate<'_>> = candidates
        .iter()
        .map(|c| (c.business.business_int_id, c))
        .collect();

    let recomendations = ranked
        .iter()
        .map(|id| {
            by_int_id
                .get(id)
                .map(|c| Recommendation::from(*c))
                .ok_or_else(|| AppError::LookupMiss(format!("ranked id {} not among candidates", id)))
        })
        .collect::<AppResult<Vec<_>>>()
        .map_err(|e| pipeline.reject(e))?;
    pipeline.advance(Stage::Responded);

    Ok(Recommendations { recomendations })
}

/// Produces recommendations for the deprecated whole-state request
pub async fn recommend_basic(
    ctx: Arc<RecommenderContext>,
    request: BasicRecommendationRequest,
) -> AppResult<BasicRecommendations> {
    let mut pipeline = Pipeline::start();

    let validated = validate_basic_request(&request, &ctx.users)
        .map_err(|field| pipeline.reject(AppError::Validation(field)))?;
    pipeline.advance(Stage::Validated);

    let catalog: Vec<&BusinessRecord> = ctx.catalog.records().iter().collect();
    let candidates = filter_by_state(
        filter_by_category(catalog, &validated.categories, &ctx.categories),
        validated.state,
    );

    if candidates.is_empty() {
        return Err(pipeline.reject(AppError::EmptyCandidateSet));
    }
    pipeline.advance(Stage::Filtered);

    let candidate_ids: Vec<u32> = candidates.iter().map(|b| b.business_int_id).collect();
    let ranked = score_with_timeout(ctx.clone(), validated.user_index, candidate_ids, validated.top_n)
        .await
        .map_err(|e| pipeline.reject(e))?
        .unwrap_or_default();
    pipeline.advance(Stage::Scored);

    let recomendations = ranked
        .iter()
        .map(|id| {
            ctx.catalog
                .get_by_int_id(*id)
                .map(BasicRecommendation::from)
                .ok_or_else(|| AppError::LookupMiss(format!("business_id_int {}", id)))
        })
        .collect::<AppResult<Vec<_>>>()
        .map_err(|e| pipeline.reject(e))?;
    pipeline.advance(Stage::Responded);

    Ok(BasicRecommendations { recomendations })
}
