use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::parsing::DegenerateFilter;

const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";
const DEFAULT_BASE_URL: &str = "https://pubmed.ncbi.nlm.nih.gov/";

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or a value does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub openrouter_api_key: String,
    pub openrouter_api_url: String,
    pub model: String,
    /// Root of the literature index the scraper searches.
    pub base_url: String,
    pub output_dir: PathBuf,
    /// Result pages scraped per generation call.
    pub page_batch_size: u32,
    pub article_delay_ms: u64,
    pub page_delay_ms: u64,
    pub degenerate_filter: DegenerateFilter,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let config = Config {
            openrouter_api_key: require_env("OPENROUTER_API_KEY")?,
            openrouter_api_url: env_or("OPENROUTER_API_URL", DEFAULT_API_URL),
            model: env_or("MODEL", DEFAULT_MODEL),
            base_url: env_or("BASE_URL", DEFAULT_BASE_URL),
            output_dir: PathBuf::from(env_or("OUTPUT_DIR", "output")),
            page_batch_size: parse_env("PAGE_BATCH_SIZE", "10")?,
            article_delay_ms: parse_env("ARTICLE_DELAY_MS", "750")?,
            page_delay_ms: parse_env("PAGE_DELAY_MS", "2500")?,
            degenerate_filter: env_or("DEGENERATE_FILTER", "all_fields")
                .parse()
                .map_err(anyhow::Error::msg)
                .context("DEGENERATE_FILTER must be 'all_fields' or 'registry_id'")?,
            port: parse_env("PORT", "8080")?,
            rust_log: env_or("RUST_LOG", "info"),
        };

        anyhow::ensure!(config.page_batch_size > 0, "PAGE_BATCH_SIZE must be at least 1");
        Ok(config)
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    env_or(key, default)
        .trim()
        .parse::<T>()
        .with_context(|| format!("{key} must be a valid number"))
}
