use serde::Deserialize;

/// Radius values accepted by the banded (current) request contract
pub const RADIUS_BANDS_KM: [i64; 3] = [25, 37, 50];

/// Upper bound on how many recommendations a single request may ask for
pub const MAX_TOP_N: i64 = 100;

/// How the `km` field of a request is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadiusPolicy {
    /// Only the fixed bands in [`RADIUS_BANDS_KM`]
    Banded,
    /// Any positive integer
    Positive,
}

impl RadiusPolicy {
    pub fn allows(&self, km: i64) -> bool {
        match self {
            RadiusPolicy::Banded => RADIUS_BANDS_KM.contains(&km),
            RadiusPolicy::Positive => km > 0,
        }
    }
}

/// Canonical recommendation request (v2)
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationRequest {
    pub km: i64,
    pub estado: String,
    pub ciudad: String,
    pub usuario: String,
    #[serde(default)]
    pub caracteristicas: Vec<String>,
    #[serde(default)]
    pub categorias: Vec<String>,
    /// Falls back to the configured default when absent
    #[serde(default)]
    pub top_n: Option<i64>,
}

/// Deprecated v1 shape: no filters, any positive radius
#[derive(Debug, Clone, Deserialize)]
pub struct V1RecommendationRequest {
    pub km: i64,
    pub estado: String,
    pub ciudad: String,
    pub usuario: String,
}

impl From<V1RecommendationRequest> for RecommendationRequest {
    fn from(v1: V1RecommendationRequest) -> Self {
        Self {
            km: v1.km,
            estado: v1.estado,
            ciudad: v1.ciudad,
            usuario: v1.usuario,
            caracteristicas: Vec::new(),
            categorias: Vec::new(),
            top_n: None,
        }
    }
}

/// Deprecated English shape: a whole state, at most one category, no distance
#[derive(Debug, Clone, Deserialize)]
pub struct BasicRecommendationRequest {
    pub state: String,
    pub user_id_str: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "default_basic_top_n")]
    pub top_n: i64,
}

fn default_basic_top_n() -> i64 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_radius_policies() {
        assert!(RadiusPolicy::Banded.allows(37));
        assert!(!RadiusPolicy::Banded.allows(10));
        assert!(!RadiusPolicy::Banded.allows(30));
        assert!(RadiusPolicy::Positive.allows(10));
        assert!(!RadiusPolicy::Positive.allows(0));
        assert!(!RadiusPolicy::Positive.allows(-25));
    }

    #[test]
    fn test_canonical_request_defaults_filters() {
        let request: RecommendationRequest = serde_json::from_value(json!({
            "km": 25,
            "estado": "MO",
            "ciudad": "Columbia",
            "usuario": "U123"
        }))
        .unwrap();
        assert!(request.caracteristicas.is_empty());
        assert!(request.categorias.is_empty());
        assert_eq!(request.top_n, None);
    }

    #[test]
    fn test_v1_adapts_to_canonical() {
        let v1: V1RecommendationRequest = serde_json::from_value(json!({
            "km": 12,
            "estado": "PA",
            "ciudad": "Philadelphia",
            "usuario": "U1"
        }))
        .unwrap();
        let request = RecommendationRequest::from(v1);
        assert_eq!(request.km, 12);
        assert_eq!(request.ciudad, "Philadelphia");
        assert!(request.categorias.is_empty());
    }

    #[test]
    fn test_basic_request_defaults() {
        let basic: BasicRecommendationRequest = serde_json::from_value(json!({
            "state": "FL",
            "user_id_str": "U1",
            "category": null
        }))
        .unwrap();
        assert_eq!(basic.top_n, 5);
        assert!(basic.category.is_none());
    }
}
