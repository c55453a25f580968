use serde::{Deserialize, Serialize};

/// Stored listening preferences for a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UserPreferences {
    /// Genre labels the user prefers, in the order they were given
    pub preferred_genres: Vec<String>,
}

impl UserPreferences {
    /// Creates preferences from a list of genres, dropping blanks and duplicates
    pub fn new(genres: Vec<String>) -> Self {
        let mut preferred_genres: Vec<String> = Vec::with_capacity(genres.len());
        for genre in genres {
            let genre = genre.trim().to_string();
            if !genre.is_empty() && !preferred_genres.contains(&genre) {
                preferred_genres.push(genre);
            }
        }
        Self { preferred_genres }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_preferences_dedup_and_trim() {
        let prefs = UserPreferences::new(vec![
            "Rock".to_string(),
            " Pop ".to_string(),
            "Rock".to_string(),
            "".to_string(),
        ]);
        assert_eq!(prefs.preferred_genres, vec!["Rock", "Pop"]);
    }

    #[test]
    fn test_default_is_empty() {
        assert!(UserPreferences::default().preferred_genres.is_empty());
    }
}
