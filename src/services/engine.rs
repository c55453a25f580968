use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::instrument;

use super::catalog::CatalogStore;
use super::features::FeatureSnapshot;
use super::recommendations;
use super::similarity::SimilarityWeights;
use crate::{
    error::AppResult,
    models::{Recommendation, SongId},
};

/// Recommendation engine holding the current feature snapshot.
///
/// Readers clone the snapshot `Arc` and rank against it without holding the
/// lock. `rebuild` builds a complete new snapshot before swapping it in, so a
/// caller always sees either the old or the new snapshot in full.
pub struct RecommendationEngine {
    store: Arc<dyn CatalogStore>,
    snapshot: RwLock<Arc<FeatureSnapshot>>,
    rebuild_lock: Mutex<()>,
    weights: SimilarityWeights,
}

impl RecommendationEngine {
    /// Creates an engine and builds the initial snapshot from the store
    pub async fn new(store: Arc<dyn CatalogStore>, weights: SimilarityWeights) -> AppResult<Self> {
        let engine = Self {
            store,
            snapshot: RwLock::new(Arc::new(FeatureSnapshot::default())),
            rebuild_lock: Mutex::new(()),
            weights,
        };
        engine.rebuild().await?;
        Ok(engine)
    }

    /// Reloads the catalog and replaces the snapshot. Returns the catalog size.
    #[instrument(skip(self), fields(store = self.store.name()))]
    pub async fn rebuild(&self) -> AppResult<usize> {
        // Serialize rebuilds so an older catalog read never overwrites a newer one
        let _guard = self.rebuild_lock.lock().await;

        let songs = self.store.get_all_songs().await?;
        let snapshot = Arc::new(FeatureSnapshot::build(songs));
        let size = snapshot.len();

        *self.snapshot.write().await = snapshot;
        tracing::info!(songs = size, "Feature snapshot rebuilt");
        Ok(size)
    }

    /// The snapshot subsequent calls will rank against
    pub async fn snapshot(&self) -> Arc<FeatureSnapshot> {
        self.snapshot.read().await.clone()
    }

    pub async fn content_based(&self, song_id: SongId, n: usize) -> Vec<Recommendation> {
        let snapshot = self.snapshot().await;
        recommendations::content_based(&snapshot, song_id, n, &self.weights)
    }

    pub async fn genre_based(&self, genres: &[String], n: usize) -> Vec<Recommendation> {
        let snapshot = self.snapshot().await;
        recommendations::genre_based(&snapshot, genres, n)
    }

    pub async fn popularity_based(&self, n: usize) -> Vec<Recommendation> {
        let snapshot = self.snapshot().await;
        recommendations::popularity_based(&snapshot, n)
    }

    /// Personalized recommendations from the user's stored rating history
    #[instrument(skip(self))]
    pub async fn hybrid(&self, user_id: &str, n: usize) -> AppResult<Vec<Recommendation>> {
        let ratings = self.store.get_user_ratings(user_id).await?;
        let snapshot = self.snapshot().await;
        let items = recommendations::hybrid(&snapshot, &ratings, n, &self.weights);
        tracing::debug!(
            ratings = ratings.len(),
            results = items.len(),
            "Hybrid recommendations computed"
        );
        Ok(items)
    }

    /// Genre recommendations over the user's stored preferred genres
    pub async fn preferred_genres(&self, user_id: &str, n: usize) -> AppResult<Vec<Recommendation>> {
        let preferences = self.store.get_preferences(user_id).await?;
        Ok(self.genre_based(&preferences.preferred_genres, n).await)
    }
}
