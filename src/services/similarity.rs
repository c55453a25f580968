use serde::{Deserialize, Serialize};

use super::features::{FeatureSnapshot, SparseVector};
use crate::models::SongId;

/// Blend weights applied to the two similarity spaces
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SimilarityWeights {
    pub lexical: f64,
    pub audio: f64,
}

impl Default for SimilarityWeights {
    /// Audio characteristics dominate shallow genre/artist text overlap
    fn default() -> Self {
        Self {
            lexical: 0.3,
            audio: 0.7,
        }
    }
}

impl SimilarityWeights {
    pub fn blend(&self, lexical: f64, audio: f64) -> f64 {
        self.lexical * lexical + self.audio * audio
    }
}

/// Cosine similarity between two dense vectors, 0 when either has zero norm
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Cosine similarity between two column-sorted sparse vectors
pub fn sparse_cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let mut dot = 0.0;
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }

    let norm_a = a.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Ranks every other song in the snapshot by blended similarity to `song_id`.
///
/// Returns at most `n` `(song_id, score)` pairs, highest score first, ties in
/// Song Index order. An unknown `song_id` has no neighbors.
pub fn rank(
    snapshot: &FeatureSnapshot,
    song_id: SongId,
    n: usize,
    weights: &SimilarityWeights,
) -> Vec<(SongId, f64)> {
    let Some(reference) = snapshot.index().row_of(song_id) else {
        return Vec::new();
    };

    let lexical = snapshot.lexical();
    let audio = snapshot.audio();

    let mut scored: Vec<(usize, f64)> = (0..snapshot.len())
        .filter(|&row| row != reference)
        .map(|row| {
            let text_sim = sparse_cosine_similarity(&lexical[reference], &lexical[row]);
            let audio_sim = cosine_similarity(&audio[reference], &audio[row]);
            (row, weights.blend(text_sim, audio_sim))
        })
        .collect();

    // Stable sort keeps Song Index order among equal scores
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(n);

    scored
        .into_iter()
        .filter_map(|(row, score)| snapshot.index().id_at(row).map(|id| (id, score)))
        .collect()
}
