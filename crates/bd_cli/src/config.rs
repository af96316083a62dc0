use bd_core::{Error, Result};

/// Scanned by the automated draft flow.
pub const DEFAULT_FEED_URL: &str =
    "https://news.google.com/rss/search?q=AI&hl=ja&gl=JP&ceid=JP:ja";

/// Process configuration, read once at startup. Components receive these
/// values explicitly; nothing reads the environment after this point.
#[derive(Debug, Clone)]
pub struct Config {
    pub sanity_token: Option<String>,
    pub gemini_api_key: Option<String>,
    pub project_id: String,
    pub dataset: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            sanity_token: env_non_empty("SANITY_API_TOKEN"),
            gemini_api_key: env_non_empty("GEMINI_API_KEY"),
            project_id: env_non_empty("SANITY_PROJECT_ID")
                .unwrap_or_else(|| "ck8ysor6".to_string()),
            dataset: env_non_empty("SANITY_DATASET").unwrap_or_else(|| "production".to_string()),
        }
    }

    /// The automated flow cannot run without a model credential.
    pub fn require_gemini_key(&self) -> Result<&str> {
        self.gemini_api_key
            .as_deref()
            .ok_or_else(|| Error::Configuration("GEMINI_API_KEY is not set".to_string()))
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}
