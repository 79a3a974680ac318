use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_LOG_FILE: &str = "precinct-map.log";

/// Settings read once at startup from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Data service base URL, without a trailing slash
    pub api_url: String,
    pub map_token: String,
    pub log_path: PathBuf,
    pub debug: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        // Load environment variables from .env file
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_url = lookup("PRECINCT_API_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Self {
            api_url: api_url.trim().trim_end_matches('/').to_string(),
            map_token: lookup("MAPBOX_TOKEN").unwrap_or_default(),
            log_path: lookup("PRECINCT_LOG_FILE")
                .map_or_else(|| PathBuf::from(DEFAULT_LOG_FILE), PathBuf::from),
            debug: lookup("DEBUG").is_some_and(|value| !value.is_empty() && value != "0"),
        }
    }

    /// The map token as it may appear in logs and on screen.
    pub fn redacted_token(&self) -> String {
        let token = self.map_token.trim();
        if token.is_empty() {
            return "(not set)".to_string();
        }

        if token.chars().count() <= 8 {
            return "****".to_string();
        }
        let prefix: String = token.chars().take(4).collect();
        format!("{prefix}****")
    }
}
