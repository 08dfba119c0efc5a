//! Translation pipeline configuration.

use serde::{Deserialize, Serialize};

/// Translation backend and cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// Translation API endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Public client key sent with each request, if the backend needs one.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Language the UI strings are authored in.
    #[serde(default = "default_source_language")]
    pub source_language: String,
    /// Maximum cached translations.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,
    /// Cache entry lifetime in seconds (one browsing session).
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: u64,
    /// Terms that must come back from the backend verbatim.
    #[serde(default = "default_preserved_terms")]
    pub preserved_terms: Vec<String>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            source_language: default_source_language(),
            cache_capacity: default_cache_capacity(),
            cache_ttl_seconds: default_cache_ttl(),
            preserved_terms: default_preserved_terms(),
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:5000/translate".to_string()
}

fn default_source_language() -> String {
    "fr".to_string()
}

fn default_cache_capacity() -> u64 {
    5000
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_preserved_terms() -> Vec<String> {
    ["BTS", "CFA", "PDF", "Google Meet", "Teams", "Zoom"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
