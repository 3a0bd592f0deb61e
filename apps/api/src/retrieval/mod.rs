//! Article retrieval: search a literature index for randomized controlled trials
//! and return their title and abstract.

pub mod pubmed;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use pubmed::PubMedScraper;

/// One scraped article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub url: String,
}

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid CSS selector '{selector}': {message}")]
    Selector { selector: String, message: String },
}

/// Source of trial articles for a search keyword.
#[async_trait]
pub trait TrialSource: Send + Sync {
    /// Number of result pages for `keyword`, or `None` when the count is not shown.
    async fn total_pages(&self, keyword: &str) -> Result<Option<u32>, RetrievalError>;

    /// Scrapes `num_pages` result pages starting at `start_page` (1-based).
    /// Pages or articles that fail to load are skipped.
    async fn scrape(
        &self,
        keyword: &str,
        num_pages: u32,
        start_page: u32,
    ) -> Result<Vec<TrialRecord>, RetrievalError>;
}
