use serde::{Deserialize, Serialize};

use super::{Song, SongId};

/// The single ranking signal attached to a recommendation.
///
/// Content-based results carry a similarity score, popularity and genre
/// results carry the popularity value. Serialized flat as either
/// `"similarity_score"` or `"popularity"`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RankingSignal {
    SimilarityScore(f64),
    Popularity(i64),
}

/// A song summary returned to the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub id: SongId,
    pub title: String,
    pub artist: String,
    pub genre: String,
    pub year: i32,
    #[serde(flatten)]
    pub signal: RankingSignal,
}

impl Recommendation {
    pub fn by_similarity(song: &Song, score: f64) -> Self {
        Self::from_song(song, RankingSignal::SimilarityScore(score))
    }

    pub fn by_popularity(song: &Song) -> Self {
        Self::from_song(song, RankingSignal::Popularity(song.popularity))
    }

    fn from_song(song: &Song, signal: RankingSignal) -> Self {
        Self {
            id: song.id,
            title: song.title.clone(),
            artist: song.artist.clone(),
            genre: song.genre.clone(),
            year: song.year,
            signal,
        }
    }

    /// Similarity score, if this item came from a content-based ranking
    pub fn similarity_score(&self) -> Option<f64> {
        match self.signal {
            RankingSignal::SimilarityScore(score) => Some(score),
            RankingSignal::Popularity(_) => None,
        }
    }

    /// Popularity, if this item came from a popularity ranking
    pub fn popularity(&self) -> Option<i64> {
        match self.signal {
            RankingSignal::Popularity(popularity) => Some(popularity),
            RankingSignal::SimilarityScore(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recommendation(signal: RankingSignal) -> Recommendation {
        Recommendation {
            id: 12,
            title: "Blinding Lights".to_string(),
            artist: "The Weeknd".to_string(),
            genre: "Synthpop".to_string(),
            year: 2019,
            signal,
        }
    }

    #[test]
    fn test_similarity_serializes_flat() {
        let json = serde_json::to_value(recommendation(RankingSignal::SimilarityScore(0.5))).unwrap();
        assert_eq!(json["similarity_score"], 0.5);
        assert!(json.get("popularity").is_none());
        assert_eq!(json["title"], "Blinding Lights");
    }

    #[test]
    fn test_popularity_serializes_flat() {
        let json = serde_json::to_value(recommendation(RankingSignal::Popularity(98))).unwrap();
        assert_eq!(json["popularity"], 98);
        assert!(json.get("similarity_score").is_none());
    }

    #[test]
    fn test_signal_accessors() {
        let item = recommendation(RankingSignal::Popularity(98));
        assert_eq!(item.popularity(), Some(98));
        assert_eq!(item.similarity_score(), None);
    }
}
