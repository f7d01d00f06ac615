//! Request validation
//!
//! Checks run in a fixed order and stop at the first failing field, so the
//! caller can name exactly one field in its 400 response. Codes (states,
//! categories, features, cities) are trimmed and uppercased before comparison;
//! user ids must match exactly.

use crate::data::{Catalog, UserIndex};
use crate::error::InvalidField;
use crate::models::request::MAX_TOP_N;
use crate::models::{
    BasicRecommendationRequest, Category, Feature, RadiusPolicy, RecommendationRequest, State,
};

/// A request that passed every check, with its fields parsed
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub state: State,
    pub city: String,
    pub radius_km: f64,
    pub user_id: String,
    pub user_index: u32,
    pub features: Vec<Feature>,
    pub categories: Vec<Category>,
    pub top_n: usize,
}

/// A deprecated whole-state request that passed every check
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedBasicRequest {
    pub state: State,
    pub user_id: String,
    pub user_index: u32,
    pub categories: Vec<Category>,
    pub top_n: usize,
}

pub fn check_state(raw: &str) -> Result<State, InvalidField> {
    State::parse(raw).ok_or(InvalidField::Estado)
}

pub fn check_features(raw: &[String]) -> Result<Vec<Feature>, InvalidField> {
    raw.iter()
        .map(|f| Feature::parse(f).ok_or(InvalidField::Caracteristicas))
        .collect()
}

pub fn check_categories(raw: &[String]) -> Result<Vec<Category>, InvalidField> {
    raw.iter()
        .map(|c| Category::parse(c).ok_or(InvalidField::Categorias))
        .collect()
}

pub fn check_city(catalog: &Catalog, state: State, city: &str) -> Result<(), InvalidField> {
    if catalog.has_city(state, city) {
        Ok(())
    } else {
        Err(InvalidField::Ciudad)
    }
}

pub fn check_radius(km: i64, policy: RadiusPolicy) -> Result<f64, InvalidField> {
    if policy.allows(km) {
        Ok(km as f64)
    } else {
        Err(InvalidField::Km)
    }
}

pub fn check_user(users: &UserIndex, user_id: &str) -> Result<u32, InvalidField> {
    users.lookup(user_id).ok_or(InvalidField::Usuario)
}

pub fn check_top_n(requested: Option<i64>, default: usize) -> Result<usize, InvalidField> {
    match requested {
        None => Ok(default),
        Some(n) if (1..=MAX_TOP_N).contains(&n) => Ok(n as usize),
        Some(_) => Err(InvalidField::TopN),
    }
}

/// Validates a canonical request against the whitelists and reference tables
///
/// Order: estado, caracteristicas, categorias, ciudad, km, usuario, top_n.
pub fn validate_request(
    request: &RecommendationRequest,
    policy: RadiusPolicy,
    catalog: &Catalog,
    users: &UserIndex,
    default_top_n: usize,
) -> Result<ValidatedRequest, InvalidField> {
    let state = check_state(&request.estado)?;
    let features = check_features(&request.caracteristicas)?;
    let categories = check_categories(&request.categorias)?;
    check_city(catalog, state, &request.ciudad)?;
    let radius_km = check_radius(request.km, policy)?;
    let user_index = check_user(users, &request.usuario)?;
    let top_n = check_top_n(request.top_n, default_top_n)?;

    Ok(ValidatedRequest {
        state,
        city: request.ciudad.trim().to_string(),
        radius_km,
        user_id: request.usuario.clone(),
        user_index,
        features,
        categories,
        top_n,
    })
}

/// Validates the deprecated English request. Failures reuse the canonical field names.
pub fn validate_basic_request(
    request: &BasicRecommendationRequest,
    users: &UserIndex,
) -> Result<ValidatedBasicRequest, InvalidField> {
    let state = check_state(&request.state)?;
    let categories = match &request.category {
        Some(category) if !category.trim().is_empty() => {
            vec![Category::parse(category).ok_or(InvalidField::Categorias)?]
        }
        _ => Vec::new(),
    };
    let user_index = check_user(users, &request.user_id_str)?;
    let top_n = check_top_n(Some(request.top_n), 0)?;

    Ok(ValidatedBasicRequest {
        state,
        user_id: request.user_id_str.clone(),
        user_index,
        categories,
        top_n,
    })
}
