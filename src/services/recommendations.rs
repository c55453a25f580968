use std::collections::HashSet;

use super::features::FeatureSnapshot;
use super::similarity::{self, SimilarityWeights};
use crate::models::{Rating, Recommendation, Song, SongId};

/// Neighbors requested per favorite song when building the hybrid pool
pub const HYBRID_NEIGHBORS_PER_FAVORITE: usize = 3;

/// Songs most similar to `song_id`, carrying their similarity score
pub fn content_based(
    snapshot: &FeatureSnapshot,
    song_id: SongId,
    n: usize,
    weights: &SimilarityWeights,
) -> Vec<Recommendation> {
    similarity::rank(snapshot, song_id, n, weights)
        .into_iter()
        .filter_map(|(id, score)| {
            snapshot
                .song(id)
                .map(|song| Recommendation::by_similarity(song, score))
        })
        .collect()
}

/// The `n` most popular songs catalog-wide, ties in catalog order
pub fn popularity_based(snapshot: &FeatureSnapshot, n: usize) -> Vec<Recommendation> {
    most_popular(snapshot.songs().iter(), n)
}

/// The `n` most popular songs whose genre is one of `genres`.
///
/// Falls back to the catalog-wide popularity list when no song matches.
pub fn genre_based(snapshot: &FeatureSnapshot, genres: &[String], n: usize) -> Vec<Recommendation> {
    let wanted: HashSet<&str> = genres.iter().map(String::as_str).collect();
    let matching: Vec<&Song> = snapshot
        .songs()
        .iter()
        .filter(|song| wanted.contains(song.genre.as_str()))
        .collect();

    if matching.is_empty() {
        tracing::debug!(genres = ?genres, "No songs match preferred genres, using popularity");
        return popularity_based(snapshot, n);
    }

    most_popular(matching.into_iter(), n)
}

/// Personalized recommendations from a user's rating history.
///
/// Content neighbors of each favorite (rating >= 4) are pooled in rating
/// order, deduplicated keeping the first occurrence, stripped of anything the
/// user already rated and stably sorted by similarity. Users without
/// favorites get the popularity list. If every candidate was filtered out the
/// popularity list minus already-rated songs is returned instead.
pub fn hybrid(
    snapshot: &FeatureSnapshot,
    ratings: &[Rating],
    n: usize,
    weights: &SimilarityWeights,
) -> Vec<Recommendation> {
    if ratings.is_empty() {
        return popularity_based(snapshot, n);
    }

    let favorites: Vec<&Rating> = ratings.iter().filter(|r| r.is_favorite()).collect();
    if favorites.is_empty() {
        return popularity_based(snapshot, n);
    }

    let rated: HashSet<SongId> = ratings.iter().map(|r| r.song_id).collect();
    let mut seen: HashSet<SongId> = HashSet::new();

    let mut pool: Vec<Recommendation> = favorites
        .iter()
        .flat_map(|favorite| {
            content_based(snapshot, favorite.song_id, HYBRID_NEIGHBORS_PER_FAVORITE, weights)
        })
        .filter(|candidate| seen.insert(candidate.id) && !rated.contains(&candidate.id))
        .collect();

    if pool.is_empty() {
        tracing::debug!(
            favorites = favorites.len(),
            "Hybrid pool empty after filtering, using unrated popular songs"
        );
        let unrated = snapshot.songs().iter().filter(|song| !rated.contains(&song.id));
        return most_popular(unrated, n);
    }

    pool.sort_by(|a, b| {
        let score_a = a.similarity_score().unwrap_or(f64::NEG_INFINITY);
        let score_b = b.similarity_score().unwrap_or(f64::NEG_INFINITY);
        score_b.total_cmp(&score_a)
    });
    pool.truncate(n);
    pool
}

fn most_popular<'a>(songs: impl Iterator<Item = &'a Song>, n: usize) -> Vec<Recommendation> {
    let mut ranked: Vec<&Song> = songs.collect();
    ranked.sort_by(|a, b| b.popularity.cmp(&a.popularity));
    ranked
        .into_iter()
        .take(n)
        .map(Recommendation::by_popularity)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed::sample_catalog;
    use chrono::Utc;

    fn snapshot() -> FeatureSnapshot {
        FeatureSnapshot::build(sample_catalog())
    }

    fn rating(snapshot: &FeatureSnapshot, song_id: SongId, value: i64) -> Rating {
        let song = snapshot.song(song_id).unwrap();
        Rating {
            user_id: "u1".to_string(),
            song_id,
            rating: value,
            rated_at: Utc::now(),
            title: song.title.clone(),
            artist: song.artist.clone(),
            genre: song.genre.clone(),
        }
    }

    fn titles(items: &[Recommendation]) -> Vec<&str> {
        items.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn test_popularity_top_three_from_sample_catalog() {
        let items = popularity_based(&snapshot(), 3);
        // Bohemian Rhapsody and Shape of You tie at 95; catalog order wins
        assert_eq!(
            titles(&items),
            vec!["Blinding Lights", "Bad Guy", "Bohemian Rhapsody"]
        );
        assert_eq!(items[0].popularity(), Some(98));
        assert_eq!(items[2].popularity(), Some(95));
        assert!(items.iter().all(|r| r.similarity_score().is_none()));
    }

    #[test]
    fn test_popularity_is_sorted_and_bounded() {
        let snapshot = snapshot();
        let items = popularity_based(&snapshot, 50);
        assert_eq!(items.len(), 20);
        assert!(items
            .windows(2)
            .all(|pair| pair[0].popularity() >= pair[1].popularity()));
        assert!(popularity_based(&FeatureSnapshot::build(Vec::new()), 5).is_empty());
    }

    #[test]
    fn test_content_based_carries_similarity() {
        let items = content_based(&snapshot(), 1, 4, &SimilarityWeights::default());
        assert_eq!(items.len(), 4);
        assert!(items.iter().all(|r| r.similarity_score().is_some()));
        assert!(items.iter().all(|r| r.id != 1));
    }

    #[test]
    fn test_content_based_unknown_song_is_empty() {
        assert!(content_based(&snapshot(), 4242, 5, &SimilarityWeights::default()).is_empty());
    }

    #[test]
    fn test_genre_based_filters_and_ranks_by_popularity() {
        let items = genre_based(&snapshot(), &["Rock".to_string()], 3);
        assert_eq!(
            titles(&items),
            vec!["Bohemian Rhapsody", "Stairway to Heaven", "Sweet Child O' Mine"]
        );
        assert!(items.iter().all(|r| r.genre == "Rock"));
    }

    #[test]
    fn test_genre_based_multiple_genres() {
        let genres = vec!["Funk".to_string(), "Soul".to_string()];
        let items = genre_based(&snapshot(), &genres, 5);
        assert_eq!(titles(&items), vec!["Uptown Funk", "Rolling in the Deep"]);
    }

    #[test]
    fn test_genre_based_without_matches_equals_popularity() {
        let snapshot = snapshot();
        let items = genre_based(&snapshot, &["Polka".to_string()], 5);
        assert_eq!(items, popularity_based(&snapshot, 5));
    }

    #[test]
    fn test_hybrid_without_ratings_equals_popularity() {
        let snapshot = snapshot();
        let items = hybrid(&snapshot, &[], 8, &SimilarityWeights::default());
        assert_eq!(items, popularity_based(&snapshot, 8));
    }

    #[test]
    fn test_hybrid_without_favorites_equals_popularity() {
        let snapshot = snapshot();
        let ratings = vec![rating(&snapshot, 1, 2), rating(&snapshot, 2, 3)];
        let items = hybrid(&snapshot, &ratings, 5, &SimilarityWeights::default());
        assert_eq!(items, popularity_based(&snapshot, 5));
    }

    #[test]
    fn test_hybrid_excludes_rated_songs() {
        let snapshot = snapshot();
        let ratings = vec![rating(&snapshot, 1, 5), rating(&snapshot, 3, 5)];
        let items = hybrid(&snapshot, &ratings, 10, &SimilarityWeights::default());
        assert!(!items.is_empty());
        assert!(items.iter().all(|r| r.id != 1 && r.id != 3));
        assert!(items.iter().all(|r| r.similarity_score().is_some()));
        assert!(items
            .windows(2)
            .all(|pair| pair[0].similarity_score() >= pair[1].similarity_score()));
    }

    #[test]
    fn test_hybrid_deduplicates_overlapping_neighbors() {
        let snapshot = snapshot();
        let weights = SimilarityWeights::default();
        let ratings = vec![rating(&snapshot, 2, 5), rating(&snapshot, 9, 4)];

        let first = content_based(&snapshot, 2, HYBRID_NEIGHBORS_PER_FAVORITE, &weights);
        let second = content_based(&snapshot, 9, HYBRID_NEIGHBORS_PER_FAVORITE, &weights);

        let items = hybrid(&snapshot, &ratings, 10, &weights);
        let mut ids: Vec<SongId> = items.iter().map(|r| r.id).collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);

        // Every shared neighbor keeps the score it had under the earlier favorite
        for shared in first.iter().filter(|a| second.iter().any(|b| b.id == a.id)) {
            if shared.id == 2 || shared.id == 9 {
                continue;
            }
            let kept = items.iter().find(|r| r.id == shared.id).unwrap();
            assert_eq!(kept.similarity_score(), shared.similarity_score());
        }
    }

    #[test]
    fn test_hybrid_respects_n() {
        let snapshot = snapshot();
        let ratings = vec![
            rating(&snapshot, 1, 5),
            rating(&snapshot, 2, 5),
            rating(&snapshot, 4, 4),
        ];
        let items = hybrid(&snapshot, &ratings, 2, &SimilarityWeights::default());
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_hybrid_falls_back_when_pool_empty() {
        let catalog: Vec<Song> = sample_catalog().into_iter().take(3).collect();
        let snapshot = FeatureSnapshot::build(catalog);
        // Every neighbor of the favorite is already rated
        let ratings = vec![
            rating(&snapshot, 1, 5),
            rating(&snapshot, 2, 1),
            rating(&snapshot, 3, 2),
        ];
        let items = hybrid(&snapshot, &ratings, 5, &SimilarityWeights::default());
        assert!(items.is_empty());

        let ratings = vec![rating(&snapshot, 1, 5), rating(&snapshot, 2, 1)];
        let items = hybrid(&snapshot, &ratings, 5, &SimilarityWeights::default());
        assert!(items.iter().all(|r| r.id == 3));
    }

    #[test]
    fn test_hybrid_fallback_returns_unrated_popular_songs() {
        let snapshot = snapshot();
        // Song 1's three neighbors are 5, 8 and 3, all rated below the favorite threshold
        let ratings = vec![
            rating(&snapshot, 1, 5),
            rating(&snapshot, 5, 1),
            rating(&snapshot, 8, 1),
            rating(&snapshot, 3, 1),
        ];
        let items = hybrid(&snapshot, &ratings, 4, &SimilarityWeights::default());

        let ids: Vec<SongId> = items.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![12, 13, 11, 14]);
        let popularity: Vec<Option<i64>> = items.iter().map(Recommendation::popularity).collect();
        assert_eq!(popularity, vec![Some(98), Some(96), Some(95), Some(93)]);
        assert!(items.iter().all(|r| r.similarity_score().is_none()));
    }
}
