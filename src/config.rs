use serde::Deserialize;

use crate::services::similarity::SimilarityWeights;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// SQLite database connection URL
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Insert the sample catalog when the songs table is empty
    #[serde(default = "default_seed_sample_data")]
    pub seed_sample_data: bool,

    /// Weight of the text (genre/artist/year) similarity in the blended score
    #[serde(default = "default_lexical_weight")]
    pub lexical_weight: f64,

    /// Weight of the audio attribute similarity in the blended score
    #[serde(default = "default_audio_weight")]
    pub audio_weight: f64,
}

fn default_database_url() -> String {
    "sqlite://music_recommendations.db".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_seed_sample_data() -> bool {
    true
}

fn default_lexical_weight() -> f64 {
    SimilarityWeights::default().lexical
}

fn default_audio_weight() -> f64 {
    SimilarityWeights::default().audio
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        for (name, value) in [
            ("LEXICAL_WEIGHT", self.lexical_weight),
            ("AUDIO_WEIGHT", self.audio_weight),
        ] {
            if !value.is_finite() || value < 0.0 {
                anyhow::bail!("{} must be a finite, non-negative number (got {})", name, value);
            }
        }
        Ok(())
    }

    /// Similarity blend weights for the ranker
    pub fn similarity_weights(&self) -> SimilarityWeights {
        SimilarityWeights {
            lexical: self.lexical_weight,
            audio: self.audio_weight,
        }
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
