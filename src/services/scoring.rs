/// Scoring adapter
///
/// The recommender model is an opaque, pre-trained artifact. The pipeline only
/// depends on the [`Scorer`] contract: given a user index, candidate item ids and
/// the two static feature matrices, return one score per candidate.
use ndarray::Array2;
use serde::Deserialize;
use std::cmp::Ordering;

use crate::error::{AppError, AppResult};

/// Side-information matrices consumed by the scoring model
#[derive(Debug, Clone)]
pub struct FeatureMatrices {
    /// One row per user index
    pub user: Array2<f32>,
    /// One row per business integer id
    pub item: Array2<f32>,
}

impl FeatureMatrices {
    pub fn new(user: Array2<f32>, item: Array2<f32>) -> Self {
        Self { user, item }
    }

    /// Identity matrices: every user and item is its own single feature
    pub fn identity(users: usize, items: usize) -> Self {
        Self {
            user: Array2::eye(users),
            item: Array2::eye(items),
        }
    }
}

/// Row-major dense matrix as stored on disk
#[derive(Debug, Clone, Deserialize)]
pub struct DenseMatrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<f32>,
}

impl DenseMatrix {
    pub fn into_array(self) -> AppResult<Array2<f32>> {
        Array2::from_shape_vec((self.rows, self.cols), self.data)
            .map_err(|e| AppError::Data(format!("matrix shape mismatch: {}", e)))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ScoringError {
    #[error("{kind} index {index} out of range (len {len})")]
    IndexOutOfRange {
        kind: &'static str,
        index: u32,
        len: usize,
    },

    #[error("backend failure: {0}")]
    Backend(String),
}

impl From<ScoringError> for AppError {
    fn from(err: ScoringError) -> Self {
        match err {
            ScoringError::IndexOutOfRange { .. } => AppError::LookupMiss(err.to_string()),
            ScoringError::Backend(msg) => AppError::Scoring(msg),
        }
    }
}

/// Batch-predict contract of the recommendation model
#[cfg_attr(test, mockall::automock)]
pub trait Scorer: Send + Sync {
    /// Scores every item in `item_ids` for `user_index`, in the same order
    fn predict(
        &self,
        user_index: u32,
        item_ids: &[u32],
        features: &FeatureMatrices,
    ) -> Result<Vec<f32>, ScoringError>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Orders candidates by descending score; ties go to the lower id, NaN sorts last
fn rank_order(a: &(u32, f32), b: &(u32, f32)) -> Ordering {
    let key = |s: f32| if s.is_nan() { f32::NEG_INFINITY } else { s };
    key(b.1)
        .partial_cmp(&key(a.1))
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.0.cmp(&b.0))
}

/// Scores `candidate_ids` and returns the `top_n` best, best first
pub fn score_and_rank(
    scorer: &dyn Scorer,
    features: &FeatureMatrices,
    user_index: u32,
    candidate_ids: &[u32],
    top_n: usize,
) -> AppResult<Vec<u32>> {
    if candidate_ids.is_empty() || top_n == 0 {
        return Ok(Vec::new());
    }

    let scores = scorer.predict(user_index, candidate_ids, features)?;
    if scores.len() != candidate_ids.len() {
        return Err(AppError::Scoring(format!(
            "{} returned {} scores for {} candidates",
            scorer.name(),
            scores.len(),
            candidate_ids.len()
        )));
    }

    let mut scored: Vec<(u32, f32)> = candidate_ids.iter().copied().zip(scores).collect();
    scored.sort_by(rank_order);
    scored.truncate(top_n);

    tracing::debug!(
        backend = scorer.name(),
        user_index,
        candidates = candidate_ids.len(),
        kept = scored.len(),
        "Candidates ranked"
    );

    Ok(scored.into_iter().map(|(id, _)| id).collect())
}
