use std::sync::Arc;

use crate::{
    error::AppResult,
    services::{CatalogStore, RecommendationEngine, SimilarityWeights},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
    pub engine: Arc<RecommendationEngine>,
}

impl AppState {
    /// Creates the state and builds the first feature snapshot from the store
    pub async fn new(store: Arc<dyn CatalogStore>, weights: SimilarityWeights) -> AppResult<Self> {
        let engine = RecommendationEngine::new(store.clone(), weights).await?;
        Ok(Self {
            store,
            engine: Arc::new(engine),
        })
    }
}
