use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails fast if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Full URL of the generation endpoint, e.g. `http://localhost:11434/api/generate`.
    pub generation_base_url: String,
    /// Model name passed to the generation backend on every call.
    pub generation_model: String,
    /// Number of background enrichment workers (caps concurrent backend calls).
    pub enrichment_workers: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            generation_base_url: std::env::var("GENERATION_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:11434/api/generate".to_string()),
            generation_model: std::env::var("GENERATION_MODEL")
                .unwrap_or_else(|_| "llama3.1:8b".to_string()),
            enrichment_workers: std::env::var("ENRICHMENT_WORKERS")
                .unwrap_or_else(|_| "4".to_string())
                .parse::<usize>()
                .context("ENRICHMENT_WORKERS must be a positive integer")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
