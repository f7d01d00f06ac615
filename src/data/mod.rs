pub mod loader;
pub mod tables;

use std::sync::Arc;
use std::time::Duration;

pub use loader::load_context;
pub use tables::{Catalog, CategoryMap, CityCoordinates, UserIndex};

use crate::config::Config;
use crate::services::scoring::{FeatureMatrices, Scorer};

/// Per-process pipeline knobs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineSettings {
    pub top_n: usize,
    pub scoring_timeout: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            top_n: 5,
            scoring_timeout: Duration::from_secs(2),
        }
    }
}

impl From<&Config> for PipelineSettings {
    fn from(config: &Config) -> Self {
        Self {
            top_n: config.top_n,
            scoring_timeout: config.scoring_timeout(),
        }
    }
}

/// Everything a request needs, built once at startup and never mutated
pub struct RecommenderContext {
    pub catalog: Catalog,
    pub users: UserIndex,
    pub categories: CategoryMap,
    pub coordinates: CityCoordinates,
    pub features: FeatureMatrices,
    pub scorer: Arc<dyn Scorer>,
    pub settings: PipelineSettings,
}

impl RecommenderContext {
    pub fn new(
        catalog: Catalog,
        users: UserIndex,
        categories: CategoryMap,
        coordinates: CityCoordinates,
        features: FeatureMatrices,
        scorer: Arc<dyn Scorer>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            catalog,
            users,
            categories,
            coordinates,
            features,
            scorer,
            settings,
        }
    }
}
