use anyhow::{bail, Context, Result};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_SCREENING_CONCURRENCY: usize = 8;

/// Application configuration loaded from environment variables.
/// Missing `OPENAI_API_KEY` is not an error: screening runs in basic (keyword-only) mode.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    /// Upper bound on candidates parsed and matched at once during a batch run.
    pub screening_concurrency: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let screening_concurrency = match optional_env("SCREENING_CONCURRENCY") {
            Some(raw) => raw
                .parse::<usize>()
                .context("SCREENING_CONCURRENCY must be a positive integer")?,
            None => DEFAULT_SCREENING_CONCURRENCY,
        };
        if screening_concurrency == 0 {
            bail!("SCREENING_CONCURRENCY must be at least 1");
        }

        Ok(Config {
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_base_url: optional_env("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            screening_concurrency,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads an env var, treating unset and blank the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            openai_api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            screening_concurrency: 4,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}
