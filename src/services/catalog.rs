//! Catalog storage abstraction
//!
//! The recommendation engine only needs a small read/write contract from
//! storage: the ordered song list, single-song lookup, rating history and
//! the stored genre preferences. `SqliteCatalog` is the production
//! implementation; tests use the generated `MockCatalogStore`.

use crate::{
    error::AppResult,
    models::{NewRating, NewSong, Rating, Song, SongId, UserPreferences},
};

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    /// All songs in stable insertion order. This order defines the Song Index.
    async fn get_all_songs(&self) -> AppResult<Vec<Song>>;

    /// A single song by identifier
    async fn get_song(&self, id: SongId) -> AppResult<Option<Song>>;

    /// Adds a song and returns it with its assigned identifier
    async fn add_song(&self, song: NewSong) -> AppResult<Song>;

    /// Current ratings of a user in the order they were first made,
    /// joined with song display metadata
    async fn get_user_ratings(&self, user_id: &str) -> AppResult<Vec<Rating>>;

    /// Inserts or replaces the user's rating of a song
    async fn add_rating(&self, rating: NewRating) -> AppResult<Rating>;

    /// Stored genre preferences, empty if the user never set any
    async fn get_preferences(&self, user_id: &str) -> AppResult<UserPreferences>;

    /// Replaces the stored genre preferences of a user
    async fn set_preferences(&self, user_id: &str, preferences: UserPreferences) -> AppResult<()>;

    /// Store name for logging
    fn name(&self) -> &'static str;
}
