use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SongId;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

/// Ratings at or above this value mark a song as a favorite
pub const FAVORITE_THRESHOLD: i64 = 4;

/// A user's current rating of a song, joined with display metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Rating {
    pub user_id: String,
    pub song_id: SongId,
    pub rating: i64,
    pub rated_at: DateTime<Utc>,
    pub title: String,
    pub artist: String,
    pub genre: String,
}

impl Rating {
    pub fn is_favorite(&self) -> bool {
        self.rating >= FAVORITE_THRESHOLD
    }
}

/// Request to rate a song
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewRating {
    pub user_id: String,
    pub song_id: SongId,
    pub rating: i64,
}

impl NewRating {
    /// Checks the rating value and user identifier
    pub fn validate(&self) -> Result<(), String> {
        if self.user_id.trim().is_empty() {
            return Err("user_id must not be empty".to_string());
        }
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(format!(
                "rating must be between {} and {} (got {})",
                MIN_RATING, MAX_RATING, self.rating
            ));
        }
        Ok(())
    }
}
