pub mod factorization;
pub mod filtering;
pub mod geo;
pub mod recommendations;
pub mod scoring;
pub mod validation;

pub use factorization::FactorizationModel;
pub use recommendations::{recommend, recommend_basic, Stage};
pub use scoring::{FeatureMatrices, Scorer, ScoringError};
