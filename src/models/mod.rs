pub mod rating;
pub mod recommendation;
pub mod song;
pub mod user_preferences;

pub use rating::{NewRating, Rating, FAVORITE_THRESHOLD, MAX_RATING, MIN_RATING};
pub use recommendation::{RankingSignal, Recommendation};
pub use song::{NewSong, Song, SongId};
pub use user_preferences::UserPreferences;
