use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::OnceLock;

use crate::models::{Song, SongId};

/// Maximum number of terms kept in the lexical vocabulary
pub const MAX_VOCABULARY: usize = 1000;

/// Number of standardized audio columns: energy, danceability, valence,
/// acousticness, popularity
pub const AUDIO_DIM: usize = 5;

/// Sparse row as `(column, weight)` pairs sorted by column
pub type SparseVector = Vec<(usize, f64)>;

/// Dense standardized audio row
pub type AudioVector = [f64; AUDIO_DIM];

const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst",
    "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway",
    "anywhere", "are", "around", "as", "at", "back", "be", "became", "because", "become",
    "becomes", "becoming", "been", "before", "beforehand", "behind", "being", "below", "beside",
    "besides", "between", "beyond", "bill", "both", "bottom", "but", "by", "call", "can",
    "cannot", "cant", "co", "con", "could", "couldnt", "cry", "de", "describe", "detail", "do",
    "done", "down", "due", "during", "each", "eg", "eight", "either", "eleven", "else",
    "elsewhere", "empty", "enough", "etc", "even", "ever", "every", "everyone", "everything",
    "everywhere", "except", "few", "fifteen", "fifty", "fill", "find", "fire", "first", "five",
    "for", "former", "formerly", "forty", "found", "four", "from", "front", "full", "further",
    "get", "give", "go", "had", "has", "hasnt", "have", "he", "hence", "her", "here",
    "hereafter", "hereby", "herein", "hereupon", "hers", "herself", "him", "himself", "his",
    "how", "however", "hundred", "i", "ie", "if", "in", "inc", "indeed", "interest", "into",
    "is", "it", "its", "itself", "keep", "last", "latter", "latterly", "least", "less", "ltd",
    "made", "many", "may", "me", "meanwhile", "might", "mill", "mine", "more", "moreover",
    "most", "mostly", "move", "much", "must", "my", "myself", "name", "namely", "neither",
    "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
    "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto", "or",
    "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "part",
    "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem", "seemed",
    "seeming", "seems", "serious", "several", "she", "should", "show", "side", "since",
    "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something", "sometime",
    "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than", "that", "the",
    "their", "them", "themselves", "then", "thence", "there", "thereafter", "thereby",
    "therefore", "therein", "thereupon", "these", "they", "thick", "thin", "third", "this",
    "those", "though", "three", "through", "throughout", "thru", "thus", "to", "together", "too",
    "top", "toward", "towards", "twelve", "twenty", "two", "un", "under", "until", "up", "upon",
    "us", "very", "via", "was", "we", "well", "were", "what", "whatever", "when", "whence",
    "whenever", "where", "whereafter", "whereas", "whereby", "wherein", "whereupon", "wherever",
    "whether", "which", "while", "whither", "who", "whoever", "whole", "whom", "whose", "why",
    "will", "with", "within", "without", "would", "yet", "you", "your", "yours", "yourself",
    "yourselves",
];

fn stop_words() -> &'static HashSet<&'static str> {
    static STOP_WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();
    STOP_WORDS.get_or_init(|| ENGLISH_STOP_WORDS.iter().copied().collect())
}

/// Splits text into lowercase word tokens of at least two characters,
/// dropping English stop words.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2)
        .filter(|token| !stop_words().contains(token))
        .map(str::to_string)
        .collect()
}

/// Term-frequency / inverse-document-frequency vectorizer with a capped,
/// deterministic vocabulary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TfidfVectorizer {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Fits the vocabulary and idf weights over a corpus.
    ///
    /// Terms are ranked by total corpus count, ties broken alphabetically, and
    /// the top `max_features` are kept. Columns are assigned in alphabetical
    /// order. Idf is smoothed: `ln((1 + n) / (1 + df)) + 1`.
    pub fn fit(corpus: &[String], max_features: usize) -> Self {
        let mut term_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();

        for document in corpus {
            let tokens = tokenize(document);
            let mut seen: HashSet<&str> = HashSet::new();
            for token in &tokens {
                *term_counts.entry(token.clone()).or_default() += 1;
                if seen.insert(token.as_str()) {
                    *document_frequency.entry(token.clone()).or_default() += 1;
                }
            }
        }

        // BTreeMap iteration is alphabetical and the sort is stable, so equal
        // counts keep alphabetical order.
        let mut ranked: Vec<(&String, &usize)> = term_counts.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(a.1));
        let mut kept: Vec<&String> = ranked
            .into_iter()
            .take(max_features)
            .map(|(term, _)| term)
            .collect();
        kept.sort();

        let n_documents = corpus.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(kept.len());
        for (column, term) in kept.into_iter().enumerate() {
            let df = document_frequency.get(term).copied().unwrap_or(0) as f64;
            idf.push(((1.0 + n_documents) / (1.0 + df)).ln() + 1.0);
            vocabulary.insert(term.clone(), column);
        }

        Self { vocabulary, idf }
    }

    /// Transforms a document into an L2-normalised sparse tf-idf row
    pub fn transform(&self, document: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for token in tokenize(document) {
            if let Some(&column) = self.vocabulary.get(&token) {
                *counts.entry(column).or_default() += 1.0;
            }
        }

        let mut row: SparseVector = counts
            .into_iter()
            .map(|(column, tf)| (column, tf * self.idf[column]))
            .collect();

        let norm = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, weight) in &mut row {
                *weight /= norm;
            }
        }
        row
    }

    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }
}

/// Standardizes each column to zero mean and unit (population) variance.
/// A zero-variance column maps to all zeros.
pub fn standardize(rows: &[AudioVector]) -> Vec<AudioVector> {
    if rows.is_empty() {
        return Vec::new();
    }
    let n = rows.len() as f64;

    let mut means = [0.0; AUDIO_DIM];
    for row in rows {
        for (mean, value) in means.iter_mut().zip(row) {
            *mean += value / n;
        }
    }

    let mut std_devs = [0.0; AUDIO_DIM];
    for row in rows {
        for (column, value) in row.iter().enumerate() {
            std_devs[column] += (value - means[column]).powi(2) / n;
        }
    }
    for std_dev in &mut std_devs {
        *std_dev = std_dev.sqrt();
    }

    rows.iter()
        .map(|row| {
            let mut standardized = [0.0; AUDIO_DIM];
            for column in 0..AUDIO_DIM {
                // Treat float noise around a constant column as zero variance
                if std_devs[column] > f64::EPSILON {
                    standardized[column] = (row[column] - means[column]) / std_devs[column];
                }
            }
            standardized
        })
        .collect()
}

/// Ordered mapping between feature-matrix rows and song identifiers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SongIndex {
    ids: Vec<SongId>,
    rows: HashMap<SongId, usize>,
}

impl SongIndex {
    pub fn new(ids: Vec<SongId>) -> Self {
        let mut rows = HashMap::with_capacity(ids.len());
        for (row, id) in ids.iter().enumerate() {
            // Identifiers are unique; keep the first row if a store hands back a duplicate
            rows.entry(*id).or_insert(row);
        }
        Self { ids, rows }
    }

    pub fn row_of(&self, id: SongId) -> Option<usize> {
        self.rows.get(&id).copied()
    }

    pub fn id_at(&self, row: usize) -> Option<SongId> {
        self.ids.get(row).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Immutable feature spaces built from one catalog load.
///
/// Row `i` of both spaces and of `songs` belongs to `index.id_at(i)`.
#[derive(Debug, Clone, Default)]
pub struct FeatureSnapshot {
    songs: Vec<Song>,
    index: SongIndex,
    lexical: Vec<SparseVector>,
    audio: Vec<AudioVector>,
    vectorizer: TfidfVectorizer,
}

impl FeatureSnapshot {
    /// Builds both feature spaces from the full catalog, in catalog order
    pub fn build(songs: Vec<Song>) -> Self {
        if songs.is_empty() {
            return Self::default();
        }

        let corpus: Vec<String> = songs.iter().map(Song::lexical_text).collect();
        let vectorizer = TfidfVectorizer::fit(&corpus, MAX_VOCABULARY);
        let lexical: Vec<SparseVector> = corpus.iter().map(|text| vectorizer.transform(text)).collect();

        let raw_audio: Vec<AudioVector> = songs.iter().map(Song::audio_attributes).collect();
        let audio = standardize(&raw_audio);

        let index = SongIndex::new(songs.iter().map(|song| song.id).collect());

        tracing::debug!(
            songs = songs.len(),
            vocabulary = vectorizer.vocabulary().len(),
            "Built feature snapshot"
        );

        Self::from_parts(songs, index, lexical, audio, vectorizer)
    }

    /// Assembles a snapshot, panicking if any part disagrees on row count
    fn from_parts(
        songs: Vec<Song>,
        index: SongIndex,
        lexical: Vec<SparseVector>,
        audio: Vec<AudioVector>,
        vectorizer: TfidfVectorizer,
    ) -> Self {
        assert_eq!(
            index.len(),
            songs.len(),
            "song index has {} rows but catalog has {} songs",
            index.len(),
            songs.len()
        );
        assert_eq!(lexical.len(), index.len(), "lexical space row count mismatch");
        assert_eq!(audio.len(), index.len(), "audio space row count mismatch");

        Self {
            songs,
            index,
            lexical,
            audio,
            vectorizer,
        }
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn song(&self, id: SongId) -> Option<&Song> {
        self.index.row_of(id).map(|row| &self.songs[row])
    }

    pub fn index(&self) -> &SongIndex {
        &self.index
    }

    pub fn lexical(&self) -> &[SparseVector] {
        &self.lexical
    }

    pub fn audio(&self) -> &[AudioVector] {
        &self.audio
    }

    /// Number of terms in the fitted lexical vocabulary
    pub fn vocabulary_size(&self) -> usize {
        self.vectorizer.vocabulary().len()
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed::sample_catalog;

    #[test]
    fn test_tokenize_drops_stop_words_and_short_tokens() {
        assert_eq!(tokenize("Rock Guns N' Roses 1987"), vec!["rock", "guns", "roses", "1987"]);
        assert_eq!(tokenize("Synthpop The Weeknd 2019"), vec!["synthpop", "weeknd", "2019"]);
    }

    #[test]
    fn test_vocabulary_is_alphabetical_and_deterministic() {
        let corpus = vec!["Rock Queen 1975".to_string(), "Rock Eagles 1976".to_string()];
        let first = TfidfVectorizer::fit(&corpus, MAX_VOCABULARY);
        let second = TfidfVectorizer::fit(&corpus, MAX_VOCABULARY);
        assert_eq!(first, second);

        let terms: Vec<&String> = first.vocabulary().keys().collect();
        assert_eq!(terms, vec!["1975", "1976", "eagles", "queen", "rock"]);
        assert_eq!(first.vocabulary()["1975"], 0);
        assert_eq!(first.vocabulary()["rock"], 4);
    }

    #[test]
    fn test_idf_is_smoothed() {
        let corpus = vec!["Rock Queen".to_string(), "Rock Eagles".to_string()];
        let vectorizer = TfidfVectorizer::fit(&corpus, MAX_VOCABULARY);
        let rock = vectorizer.idf()[vectorizer.vocabulary()["rock"]];
        let queen = vectorizer.idf()[vectorizer.vocabulary()["queen"]];
        assert!((rock - 1.0).abs() < 1e-12);
        assert!((queen - ((3.0f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_vocabulary_cap_keeps_most_frequent_terms() {
        let corpus = vec![
            "rock rock pop".to_string(),
            "rock jazz".to_string(),
            "pop blues".to_string(),
        ];
        let vectorizer = TfidfVectorizer::fit(&corpus, 2);
        let terms: Vec<&String> = vectorizer.vocabulary().keys().collect();
        assert_eq!(terms, vec!["pop", "rock"]);
    }

    #[test]
    fn test_transform_rows_are_unit_length() {
        let corpus = vec!["Rock Queen 1975".to_string(), "Pop ABBA 1976".to_string()];
        let vectorizer = TfidfVectorizer::fit(&corpus, MAX_VOCABULARY);
        let row = vectorizer.transform(&corpus[0]);
        let norm: f64 = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-12);
        assert!(vectorizer.transform("the of and").is_empty());
    }

    #[test]
    fn test_standardize_zero_mean_unit_variance() {
        let rows = vec![[1.0, 5.0, 0.0, 0.0, 10.0], [3.0, 5.0, 0.0, 0.0, 20.0]];
        let standardized = standardize(&rows);
        assert_eq!(standardized[0][0], -1.0);
        assert_eq!(standardized[1][0], 1.0);
        assert_eq!(standardized[0][4], -1.0);
        // constant columns collapse to zero
        assert_eq!(standardized[0][1], 0.0);
        assert_eq!(standardized[1][1], 0.0);
    }

    #[test]
    fn test_empty_catalog_yields_empty_snapshot() {
        let snapshot = FeatureSnapshot::build(Vec::new());
        assert!(snapshot.is_empty());
        assert!(snapshot.index().is_empty());
        assert!(snapshot.lexical().is_empty());
        assert!(snapshot.audio().is_empty());
        assert_eq!(snapshot.vocabulary_size(), 0);
    }

    #[test]
    fn test_snapshot_rows_follow_catalog_order() {
        let catalog = sample_catalog();
        let snapshot = FeatureSnapshot::build(catalog.clone());
        assert_eq!(snapshot.len(), 20);
        for (row, song) in catalog.iter().enumerate() {
            assert_eq!(snapshot.index().id_at(row), Some(song.id));
            assert_eq!(snapshot.index().row_of(song.id), Some(row));
        }
        assert_eq!(snapshot.song(12).map(|s| s.title.as_str()), Some("Blinding Lights"));
        assert!(snapshot.song(999).is_none());

        let corpus: Vec<String> = catalog.iter().map(Song::lexical_text).collect();
        let fitted = TfidfVectorizer::fit(&corpus, MAX_VOCABULARY);
        assert_eq!(snapshot.vocabulary_size(), fitted.vocabulary().len());
    }

    #[test]
    #[should_panic(expected = "song index has")]
    fn test_mismatched_index_panics() {
        let catalog = sample_catalog();
        let index = SongIndex::new(vec![1, 2]);
        let _ = FeatureSnapshot::from_parts(
            catalog,
            index,
            Vec::new(),
            Vec::new(),
            TfidfVectorizer::default(),
        );
    }
}
