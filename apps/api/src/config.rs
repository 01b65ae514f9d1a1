use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// `GEMINI_API_KEY` is deliberately optional here: a missing credential is
/// reported at the first generation attempt as a configuration error on that
/// request, so the service can still serve /health and /stats unconfigured.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    /// DISABLE_SAFETY=1 drops the Gemini safety settings from requests.
    pub disable_safety: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|key| !key.is_empty()),
            disable_safety: std::env::var("DISABLE_SAFETY")
                .map(|v| v == "1")
                .unwrap_or(false),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
