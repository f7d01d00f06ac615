use std::sync::Arc;

use crate::data::RecommenderContext;

/// Shared application state
///
/// The context is read-only for the life of the process, so handlers share it
/// without locking.
#[derive(Clone)]
pub struct AppState {
    pub context: Arc<RecommenderContext>,
}

impl AppState {
    pub fn new(context: RecommenderContext) -> Self {
        Self {
            context: Arc::new(context),
        }
    }
}
