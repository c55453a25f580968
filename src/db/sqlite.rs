use std::str::FromStr;

use chrono::Utc;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

use super::seed::sample_songs;
use crate::{
    error::{AppError, AppResult},
    models::{NewRating, NewSong, Rating, Song, SongId, UserPreferences},
    services::CatalogStore,
};

const SONG_COLUMNS: &str = "id, title, artist, genre, year, duration, energy, danceability, \
                            valence, acousticness, popularity";

/// Creates a SQLite connection pool and applies the schema migrations
///
/// In-memory databases are per-connection, so they get a single-connection pool.
pub async fn create_pool(database_url: &str) -> AppResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool_options = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    let pool = pool_options.connect_with(options).await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Catalog store backed by SQLite
#[derive(Clone)]
pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connects to `database_url` and applies migrations
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        Ok(Self::new(create_pool(database_url).await?))
    }

    /// Inserts the sample catalog if the songs table is empty.
    /// Returns the number of songs inserted.
    pub async fn seed_sample_data(&self) -> AppResult<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM songs")
            .fetch_one(&self.pool)
            .await?;
        if count > 0 {
            return Ok(0);
        }

        let songs = sample_songs();
        let mut tx = self.pool.begin().await?;
        for song in &songs {
            insert_song(&mut *tx, song).await?;
        }
        tx.commit().await?;

        tracing::info!(songs = songs.len(), "Seeded sample catalog");
        Ok(songs.len())
    }

    async fn fetch_rating(&self, user_id: &str, song_id: SongId) -> AppResult<Option<Rating>> {
        let rating = sqlx::query_as::<_, Rating>(
            "SELECT ur.user_id, ur.song_id, ur.rating, ur.rated_at, s.title, s.artist, s.genre \
             FROM user_ratings ur \
             JOIN songs s ON ur.song_id = s.id \
             WHERE ur.user_id = ? AND ur.song_id = ?",
        )
        .bind(user_id)
        .bind(song_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(rating)
    }
}

async fn insert_song<'e, E>(executor: E, song: &NewSong) -> AppResult<SongId>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let result = sqlx::query(
        "INSERT INTO songs (title, artist, genre, year, duration, energy, danceability, \
         valence, acousticness, popularity) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&song.title)
    .bind(&song.artist)
    .bind(&song.genre)
    .bind(song.year)
    .bind(song.duration)
    .bind(song.energy)
    .bind(song.danceability)
    .bind(song.valence)
    .bind(song.acousticness)
    .bind(song.popularity)
    .execute(executor)
    .await?;
    Ok(result.last_insert_rowid())
}

#[async_trait::async_trait]
impl CatalogStore for SqliteCatalog {
    async fn get_all_songs(&self) -> AppResult<Vec<Song>> {
        let songs = sqlx::query_as::<_, Song>(&format!(
            "SELECT {} FROM songs ORDER BY id",
            SONG_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(songs)
    }

    async fn get_song(&self, id: SongId) -> AppResult<Option<Song>> {
        let song = sqlx::query_as::<_, Song>(&format!(
            "SELECT {} FROM songs WHERE id = ?",
            SONG_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(song)
    }

    async fn add_song(&self, song: NewSong) -> AppResult<Song> {
        let id = insert_song(&self.pool, &song).await?;
        tracing::info!(song_id = id, title = %song.title, "Song added");
        Ok(song.with_id(id))
    }

    async fn get_user_ratings(&self, user_id: &str) -> AppResult<Vec<Rating>> {
        let ratings = sqlx::query_as::<_, Rating>(
            "SELECT ur.user_id, ur.song_id, ur.rating, ur.rated_at, s.title, s.artist, s.genre \
             FROM user_ratings ur \
             JOIN songs s ON ur.song_id = s.id \
             WHERE ur.user_id = ? \
             ORDER BY ur.id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ratings)
    }

    async fn add_rating(&self, rating: NewRating) -> AppResult<Rating> {
        rating.validate().map_err(AppError::InvalidInput)?;

        // ON CONFLICT keeps the row id, so a re-rated song stays in its original position
        sqlx::query(
            "INSERT INTO user_ratings (user_id, song_id, rating, rated_at) VALUES (?, ?, ?, ?) \
             ON CONFLICT (user_id, song_id) \
             DO UPDATE SET rating = excluded.rating, rated_at = excluded.rated_at",
        )
        .bind(&rating.user_id)
        .bind(rating.song_id)
        .bind(rating.rating)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        tracing::info!(
            user_id = %rating.user_id,
            song_id = rating.song_id,
            rating = rating.rating,
            "Rating stored"
        );

        self.fetch_rating(&rating.user_id, rating.song_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("song {}", rating.song_id)))
    }

    async fn get_preferences(&self, user_id: &str) -> AppResult<UserPreferences> {
        let stored: Option<String> =
            sqlx::query_scalar("SELECT preferred_genres FROM user_preferences WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        match stored {
            Some(json) => {
                let genres: Vec<String> = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Corrupt preferences for {}: {}", user_id, e))
                })?;
                Ok(UserPreferences::new(genres))
            }
            None => Ok(UserPreferences::default()),
        }
    }

    async fn set_preferences(&self, user_id: &str, preferences: UserPreferences) -> AppResult<()> {
        let genres = serde_json::to_string(&preferences.preferred_genres)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        sqlx::query(
            "INSERT INTO user_preferences (user_id, preferred_genres, last_updated) VALUES (?, ?, ?) \
             ON CONFLICT (user_id) \
             DO UPDATE SET preferred_genres = excluded.preferred_genres, \
             last_updated = excluded.last_updated",
        )
        .bind(user_id)
        .bind(genres)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}
