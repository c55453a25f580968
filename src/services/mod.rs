pub mod catalog;
pub mod engine;
pub mod features;
pub mod recommendations;
pub mod similarity;

pub use catalog::CatalogStore;
pub use engine::RecommendationEngine;
pub use features::FeatureSnapshot;
pub use similarity::SimilarityWeights;
