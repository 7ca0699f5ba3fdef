//! Remote endpoint configuration
//!
//! One hosted stack serves all three collaborators (backend, identity,
//! storage), so a single base URL and API key cover them.

use thiserror::Error;

/// Default bucket for uploaded cover images.
const DEFAULT_BUCKET: &str = "book-covers";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingVar(String),
}

/// Connection settings for the hosted service stack.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL, no trailing slash.
    pub base_url: String,
    /// Publishable API key sent with every request.
    pub anon_key: String,
    /// Object-storage bucket for media assets.
    pub bucket: String,
}

impl RemoteConfig {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            bucket: DEFAULT_BUCKET.to_string(),
        }
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    /// Read settings from `SUPABASE_URL`, `SUPABASE_ANON_KEY` and the
    /// optional `COVER_BUCKET`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("SUPABASE_URL")
            .map_err(|_| ConfigError::MissingVar("SUPABASE_URL".to_string()))?;
        let anon_key = std::env::var("SUPABASE_ANON_KEY")
            .map_err(|_| ConfigError::MissingVar("SUPABASE_ANON_KEY".to_string()))?;

        let mut config = Self::new(base_url, anon_key);
        if let Ok(bucket) = std::env::var("COVER_BUCKET") {
            config.bucket = bucket;
        }
        Ok(config)
    }
}
