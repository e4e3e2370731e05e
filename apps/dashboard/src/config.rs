use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// The matching endpoint is optional: a missing URL is reported to the user
/// when they search, it never stops the server from starting.
#[derive(Debug, Clone)]
pub struct Config {
    pub search_api_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            search_api_url: optional_env("SEARCH_API_URL"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads an environment variable, treating unset and blank values alike.
fn optional_env(key: &str) -> Option<String> {
    normalize_optional(std::env::var(key).ok())
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
