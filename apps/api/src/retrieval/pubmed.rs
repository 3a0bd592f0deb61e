//! PubMed search-result scraper.
//!
//! Search pages are filtered to randomized controlled trials, sorted by date,
//! ten results per page. HTML is parsed synchronously into owned values before
//! the next request so no `Html` document is held across an `.await`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::retrieval::{RetrievalError, TrialRecord, TrialSource};

pub const RESULTS_PER_PAGE: u32 = 10;
const RCT_FILTER: &str = "pubt.randomizedcontrolledtrial";
const MISSING_ABSTRACT: &str = "Abstract not available";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) trialsift/0.1";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Compiled selectors for the search and article pages.
#[derive(Debug)]
pub struct Selectors {
    results_amount: Selector,
    article_link: Selector,
    title: Selector,
    abstract_content: Selector,
}

impl Selectors {
    pub fn new() -> Result<Self, RetrievalError> {
        Ok(Self {
            results_amount: compile("div.results-amount span.value")?,
            article_link: compile("a.docsum-title")?,
            title: compile("h1.heading-title")?,
            abstract_content: compile("div.abstract-content.selected")?,
        })
    }
}

fn compile(selector: &str) -> Result<Selector, RetrievalError> {
    Selector::parse(selector).map_err(|e| RetrievalError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

pub struct PubMedScraper {
    client: Client,
    base_url: Url,
    selectors: Selectors,
    article_delay: Duration,
    page_delay: Duration,
}

impl PubMedScraper {
    pub fn new(
        base_url: &str,
        article_delay: Duration,
        page_delay: Duration,
    ) -> Result<Self, RetrievalError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
            selectors: Selectors::new()?,
            article_delay,
            page_delay,
        })
    }

    async fn fetch_search_page(&self, keyword: &str, page: u32) -> Result<String, RetrievalError> {
        let page = page.to_string();
        let size = RESULTS_PER_PAGE.to_string();
        let html = self
            .client
            .get(self.base_url.clone())
            .query(&[
                ("term", keyword),
                ("filter", RCT_FILTER),
                ("sort", "date"),
                ("size", size.as_str()),
                ("page", page.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(html)
    }

    async fn fetch_article(&self, url: &str) -> Result<Option<TrialRecord>, RetrievalError> {
        let html = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(parse_article(&html, url, &self.selectors))
    }
}

#[async_trait]
impl TrialSource for PubMedScraper {
    #[instrument(skip(self))]
    async fn total_pages(&self, keyword: &str) -> Result<Option<u32>, RetrievalError> {
        let html = self.fetch_search_page(keyword, 1).await?;
        let pages = parse_total_pages(&html, &self.selectors);
        match pages {
            Some(pages) => info!("Total pages available for '{keyword}': {pages}"),
            None => warn!("Could not find the result count for '{keyword}'"),
        }
        Ok(pages)
    }

    #[instrument(skip(self))]
    async fn scrape(
        &self,
        keyword: &str,
        num_pages: u32,
        start_page: u32,
    ) -> Result<Vec<TrialRecord>, RetrievalError> {
        if num_pages == 0 {
            return Ok(Vec::new());
        }

        let start_page = start_page.max(1);
        let requested_last = start_page.saturating_add(num_pages - 1);
        let total = match self.total_pages(keyword).await {
            Ok(total) => total,
            Err(e) => {
                warn!("Could not read the page count for '{keyword}': {e}");
                None
            }
        };
        let last_page = match total {
            Some(total) => requested_last.min(total),
            None => requested_last,
        };

        let mut records = Vec::new();
        for page in start_page..=last_page {
            info!("Scraping page {page} for '{keyword}'");

            let html = match self.fetch_search_page(keyword, page).await {
                Ok(html) => html,
                Err(e) => {
                    warn!("Failed to load search page {page}: {e}");
                    continue;
                }
            };

            let links = parse_article_links(&html, &self.base_url, &self.selectors);
            if links.is_empty() {
                info!("No articles found on page {page}, stopping");
                break;
            }

            for link in links {
                match self.fetch_article(&link).await {
                    Ok(Some(record)) => {
                        debug!("Scraped: {}", record.title);
                        records.push(record);
                    }
                    Ok(None) => warn!("Skipping {link}: no title found"),
                    Err(e) => warn!("Failed to scrape {link}: {e}"),
                }
                tokio::time::sleep(self.article_delay).await;
            }

            tokio::time::sleep(self.page_delay).await;
        }

        info!("Scraped {} articles for '{keyword}'", records.len());
        Ok(records)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// HTML extraction
// ────────────────────────────────────────────────────────────────────────────

/// Reads the result count (e.g. `"1,234"`) and converts it to a page count.
pub fn parse_total_pages(html: &str, selectors: &Selectors) -> Option<u32> {
    let document = Html::parse_document(html);
    let text: String = document
        .select(&selectors.results_amount)
        .next()?
        .text()
        .collect();
    let results: u32 = text.trim().replace(',', "").parse().ok()?;
    Some(results.div_ceil(RESULTS_PER_PAGE))
}

/// Absolute URLs of every article linked from a search page, resolved against
/// `base`. Links that do not resolve are skipped.
pub fn parse_article_links(html: &str, base: &Url, selectors: &Selectors) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&selectors.article_link)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| match base.join(href) {
            Ok(url) => Some(url.to_string()),
            Err(e) => {
                warn!("Skipping unresolvable link '{href}': {e}");
                None
            }
        })
        .collect()
}

/// Title and abstract of an article page. `None` when the page has no title.
pub fn parse_article(html: &str, url: &str, selectors: &Selectors) -> Option<TrialRecord> {
    let document = Html::parse_document(html);

    let title = collapse_whitespace(&document.select(&selectors.title).next()?.text().collect::<String>());
    if title.is_empty() {
        return None;
    }

    let abstract_text = document
        .select(&selectors.abstract_content)
        .next()
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| MISSING_ABSTRACT.to_string());

    Some(TrialRecord {
        title,
        abstract_text,
        url: url.to_string(),
    })
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
