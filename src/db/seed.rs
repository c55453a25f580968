use crate::models::{NewSong, Song};

/// `(title, artist, genre, year, duration, energy, danceability, valence, acousticness, popularity)`
type SeedRow = (&'static str, &'static str, &'static str, i32, i32, f64, f64, f64, f64, i64);

const SAMPLE_SONGS: &[SeedRow] = &[
    ("Bohemian Rhapsody", "Queen", "Rock", 1975, 355, 0.8, 0.3, 0.7, 0.1, 95),
    ("Billie Jean", "Michael Jackson", "Pop", 1983, 294, 0.7, 0.8, 0.6, 0.0, 90),
    ("Hotel California", "Eagles", "Rock", 1976, 391, 0.6, 0.4, 0.5, 0.2, 88),
    ("Dancing Queen", "ABBA", "Pop", 1976, 231, 0.9, 0.9, 0.8, 0.1, 85),
    ("Stairway to Heaven", "Led Zeppelin", "Rock", 1971, 482, 0.7, 0.3, 0.6, 0.3, 92),
    ("I Want It That Way", "Backstreet Boys", "Pop", 1999, 213, 0.6, 0.7, 0.8, 0.0, 80),
    ("Smells Like Teen Spirit", "Nirvana", "Grunge", 1991, 301, 0.9, 0.5, 0.4, 0.0, 87),
    ("Sweet Child O' Mine", "Guns N' Roses", "Rock", 1987, 356, 0.8, 0.6, 0.7, 0.0, 89),
    ("Like a Prayer", "Madonna", "Pop", 1989, 340, 0.7, 0.8, 0.7, 0.1, 83),
    ("Wonderwall", "Oasis", "Britpop", 1995, 259, 0.6, 0.5, 0.6, 0.6, 84),
    ("Shape of You", "Ed Sheeran", "Pop", 2017, 234, 0.8, 0.8, 0.9, 0.6, 95),
    ("Blinding Lights", "The Weeknd", "Synthpop", 2019, 200, 0.8, 0.9, 0.3, 0.0, 98),
    ("Bad Guy", "Billie Eilish", "Alternative", 2019, 194, 0.4, 0.7, 0.4, 0.6, 96),
    ("Uptown Funk", "Bruno Mars", "Funk", 2014, 270, 0.9, 0.9, 0.9, 0.0, 93),
    ("Rolling in the Deep", "Adele", "Soul", 2010, 228, 0.8, 0.7, 0.2, 0.3, 91),
    ("Somebody That I Used to Know", "Gotye", "Indie Pop", 2011, 244, 0.6, 0.6, 0.3, 0.8, 86),
    ("Radioactive", "Imagine Dragons", "Alternative Rock", 2012, 187, 0.8, 0.6, 0.5, 0.0, 89),
    ("Happy", "Pharrell Williams", "Pop", 2013, 232, 0.8, 0.9, 0.96, 0.1, 90),
    ("Get Lucky", "Daft Punk", "Electronic", 2013, 248, 0.7, 0.8, 0.9, 0.0, 88),
    ("Can't Stop the Feeling", "Justin Timberlake", "Pop", 2016, 236, 0.9, 0.9, 0.9, 0.1, 87),
];

/// The sample catalog inserted into an empty database
pub fn sample_songs() -> Vec<NewSong> {
    SAMPLE_SONGS
        .iter()
        .map(
            |&(title, artist, genre, year, duration, energy, danceability, valence, acousticness, popularity)| NewSong {
                title: title.to_string(),
                artist: artist.to_string(),
                genre: genre.to_string(),
                year,
                duration,
                energy: Some(energy),
                danceability: Some(danceability),
                valence: Some(valence),
                acousticness: Some(acousticness),
                popularity,
            },
        )
        .collect()
}

/// The sample catalog with the identifiers a fresh database assigns (1..=20)
pub fn sample_catalog() -> Vec<Song> {
    sample_songs()
        .into_iter()
        .zip(1..)
        .map(|(song, id)| song.with_id(id))
        .collect()
}
