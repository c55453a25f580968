use serde::{Deserialize, Serialize};

/// Stable catalog identifier for a song
pub type SongId = i64;

/// A song in the catalog with its audio attributes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Song {
    /// Unique identifier assigned by the catalog store
    pub id: SongId,
    pub title: String,
    pub artist: String,
    /// Free-text category label (e.g., "Rock", "Indie Pop")
    pub genre: String,
    pub year: i32,
    /// Duration in seconds
    pub duration: i32,
    pub energy: Option<f64>,
    pub danceability: Option<f64>,
    pub valence: Option<f64>,
    pub acousticness: Option<f64>,
    pub popularity: i64,
}

impl Song {
    /// Text used for the lexical feature space: genre, artist and year
    pub fn lexical_text(&self) -> String {
        format!("{} {} {}", self.genre, self.artist, self.year)
    }

    /// Audio attribute row used for the dense feature space.
    /// Missing attributes default to zero.
    pub fn audio_attributes(&self) -> [f64; 5] {
        [
            self.energy.unwrap_or(0.0),
            self.danceability.unwrap_or(0.0),
            self.valence.unwrap_or(0.0),
            self.acousticness.unwrap_or(0.0),
            self.popularity as f64,
        ]
    }
}

/// A song submitted to the catalog before an identifier is assigned
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewSong {
    pub title: String,
    pub artist: String,
    pub genre: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub duration: i32,
    #[serde(default)]
    pub energy: Option<f64>,
    #[serde(default)]
    pub danceability: Option<f64>,
    #[serde(default)]
    pub valence: Option<f64>,
    #[serde(default)]
    pub acousticness: Option<f64>,
    #[serde(default)]
    pub popularity: i64,
}

impl NewSong {
    /// Attaches a catalog identifier
    pub fn with_id(self, id: SongId) -> Song {
        Song {
            id,
            title: self.title,
            artist: self.artist,
            genre: self.genre,
            year: self.year,
            duration: self.duration,
            energy: self.energy,
            danceability: self.danceability,
            valence: self.valence,
            acousticness: self.acousticness,
            popularity: self.popularity,
        }
    }
}
