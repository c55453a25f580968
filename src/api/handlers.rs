use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{NewRating, NewSong, Rating, Recommendation, Song, SongId, UserPreferences},
};

use super::AppState;

const DEFAULT_RECOMMENDATIONS: usize = 5;
const DEFAULT_PERSONAL_RECOMMENDATIONS: usize = 10;
const MAX_RECOMMENDATIONS: usize = 100;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct CountQuery {
    pub n: Option<usize>,
}

impl CountQuery {
    fn count(&self, default: usize) -> AppResult<usize> {
        let n = self.n.unwrap_or(default);
        if n > MAX_RECOMMENDATIONS {
            return Err(AppError::InvalidInput(format!(
                "n must be at most {}",
                MAX_RECOMMENDATIONS
            )));
        }
        Ok(n)
    }
}

#[derive(Debug, Deserialize)]
pub struct GenreQuery {
    /// Comma-separated genre labels
    #[serde(default)]
    pub genres: String,
    pub n: Option<usize>,
}

impl GenreQuery {
    fn genre_list(&self) -> Vec<String> {
        self.genres
            .split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct PreferencesRequest {
    pub preferred_genres: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub songs: usize,
    pub vocabulary: usize,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Get all songs in catalog order
pub async fn get_songs(State(state): State<AppState>) -> AppResult<Json<Vec<Song>>> {
    Ok(Json(state.store.get_all_songs().await?))
}

/// Get a single song
pub async fn get_song(
    State(state): State<AppState>,
    Path(song_id): Path<SongId>,
) -> AppResult<Json<Song>> {
    state
        .store
        .get_song(song_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("song {}", song_id)))
}

/// Add a song to the catalog and rebuild the feature snapshot.
///
/// The song is committed before the rebuild, so a failed rebuild is logged
/// and the song becomes recommendable on the next reload.
pub async fn create_song(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<NewSong>,
) -> AppResult<(StatusCode, Json<Song>)> {
    if request.title.trim().is_empty() || request.artist.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "title and artist must not be empty".to_string(),
        ));
    }

    let song = state.store.add_song(request).await?;
    if let Err(e) = state.engine.rebuild().await {
        tracing::error!(
            request_id = %request_id,
            song_id = song.id,
            error = %e,
            "Snapshot rebuild failed after adding song"
        );
    }

    tracing::info!(request_id = %request_id, song_id = song.id, "Song created");
    Ok((StatusCode::CREATED, Json(song)))
}

/// Rate a song (replaces any earlier rating by the same user)
pub async fn rate_song(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<NewRating>,
) -> AppResult<Json<Rating>> {
    request.validate().map_err(AppError::InvalidInput)?;

    if state.store.get_song(request.song_id).await?.is_none() {
        return Err(AppError::NotFound(format!("song {}", request.song_id)));
    }

    tracing::info!(
        request_id = %request_id,
        user_id = %request.user_id,
        song_id = request.song_id,
        "Rating song"
    );

    Ok(Json(state.store.add_rating(request).await?))
}

/// Get a user's rating history
pub async fn get_user_ratings(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<Rating>>> {
    Ok(Json(state.store.get_user_ratings(&user_id).await?))
}

/// Get a user's stored genre preferences
pub async fn get_preferences(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<UserPreferences>> {
    Ok(Json(state.store.get_preferences(&user_id).await?))
}

/// Replace a user's genre preferences
pub async fn set_preferences(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<PreferencesRequest>,
) -> AppResult<Json<UserPreferences>> {
    let preferences = UserPreferences::new(request.preferred_genres);
    state
        .store
        .set_preferences(&user_id, preferences.clone())
        .await?;
    Ok(Json(preferences))
}

/// Songs similar to a reference song
pub async fn similar_songs(
    State(state): State<AppState>,
    Path(song_id): Path<SongId>,
    Query(params): Query<CountQuery>,
) -> AppResult<Json<Vec<Recommendation>>> {
    let n = params.count(DEFAULT_RECOMMENDATIONS)?;
    Ok(Json(state.engine.content_based(song_id, n).await))
}

/// Most popular songs within the requested genres
pub async fn genre_recommendations(
    State(state): State<AppState>,
    Query(params): Query<GenreQuery>,
) -> AppResult<Json<Vec<Recommendation>>> {
    let n = CountQuery { n: params.n }.count(DEFAULT_RECOMMENDATIONS)?;
    Ok(Json(state.engine.genre_based(&params.genre_list(), n).await))
}

/// Most popular songs catalog-wide
pub async fn popular_songs(
    State(state): State<AppState>,
    Query(params): Query<CountQuery>,
) -> AppResult<Json<Vec<Recommendation>>> {
    let n = params.count(DEFAULT_RECOMMENDATIONS)?;
    Ok(Json(state.engine.popularity_based(n).await))
}

/// Personalized recommendations from the user's ratings
pub async fn personal_recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<String>,
    Query(params): Query<CountQuery>,
) -> AppResult<Json<Vec<Recommendation>>> {
    let n = params.count(DEFAULT_PERSONAL_RECOMMENDATIONS)?;
    tracing::info!(request_id = %request_id, user_id = %user_id, n, "Personal recommendations");
    Ok(Json(state.engine.hybrid(&user_id, n).await?))
}

/// Genre recommendations over the user's stored preferred genres
pub async fn preferred_genre_recommendations(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<CountQuery>,
) -> AppResult<Json<Vec<Recommendation>>> {
    let n = params.count(DEFAULT_RECOMMENDATIONS)?;
    Ok(Json(state.engine.preferred_genres(&user_id, n).await?))
}

/// Reload the catalog and rebuild the feature snapshot
pub async fn reload(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<ReloadResponse>> {
    let songs = state.engine.rebuild().await?;
    let vocabulary = state.engine.snapshot().await.vocabulary_size();
    tracing::info!(request_id = %request_id, songs, vocabulary, "Catalog reloaded");
    Ok(Json(ReloadResponse { songs, vocabulary }))
}
