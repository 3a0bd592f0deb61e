//! End-to-end run: scrape in page batches → one generation call per batch →
//! parse everything once → write the tabular export.
//!
//! Snapshots of the scraped records and raw responses are rewritten after
//! every batch so a failed run still leaves its progress on disk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::{format_csv, OutputStore};
use crate::llm_client::prompts::TRIAL_ANALYST_SYSTEM;
use crate::llm_client::TextGenerator;
use crate::parsing::{DegenerateFilter, ResponseParser};
use crate::pipeline::prompts::build_prompt;
use crate::retrieval::{TrialRecord, TrialSource};

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub keyword: String,
    pub num_pages: u32,
    pub batch_size: u32,
    pub filter: DegenerateFilter,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub keyword: String,
    pub started_at: DateTime<Utc>,
    pub pages_requested: u32,
    pub trials_scraped: usize,
    pub responses: usize,
    pub trials_parsed: usize,
    pub groups_parsed: usize,
    /// `None` when no trial identity survived parsing.
    pub csv_path: Option<String>,
}

/// Inclusive `(first, last)` page ranges covering `1..=num_pages`.
pub fn page_batches(num_pages: u32, batch_size: u32) -> Vec<(u32, u32)> {
    let batch_size = batch_size.max(1);
    (1..=num_pages)
        .step_by(batch_size as usize)
        .map(|first| (first, first.saturating_add(batch_size - 1).min(num_pages)))
        .collect()
}

pub async fn run_pipeline(
    source: &dyn TrialSource,
    generator: &dyn TextGenerator,
    store: &OutputStore,
    options: RunOptions,
) -> Result<RunSummary, AppError> {
    let keyword = options.keyword.trim().to_string();
    if keyword.is_empty() {
        return Err(AppError::Validation("keyword must not be empty".to_string()));
    }
    if options.num_pages == 0 {
        return Err(AppError::Validation("num_pages must be at least 1".to_string()));
    }

    match source.total_pages(&keyword).await {
        Ok(Some(total)) if options.num_pages > total => {
            return Err(AppError::Validation(format!(
                "Please enter a number between 1 and {total}"
            )));
        }
        Ok(_) => {}
        Err(e) => warn!("Could not read the page count for '{keyword}': {e}"),
    }

    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    info!(%run_id, "Starting run for '{keyword}' over {} page(s)", options.num_pages);

    let mut scraped: Vec<TrialRecord> = Vec::new();
    let mut responses: Vec<String> = Vec::new();
    let mut failed_generations = 0usize;
    let mut last_generation_error = None;

    for (first, last) in page_batches(options.num_pages, options.batch_size) {
        info!("Scraping pages {first} to {last}...");
        let batch = match source.scrape(&keyword, last - first + 1, first).await {
            Ok(batch) => batch,
            Err(e) => {
                warn!("Scraping pages {first} to {last} failed: {e}");
                continue;
            }
        };

        scraped.extend(batch.iter().cloned());
        store.save_scraped(&keyword, &scraped).await?;

        if batch.is_empty() {
            info!("No trial data found in pages {first} to {last}, continuing");
            continue;
        }

        let prompt = build_prompt(&batch);
        match generator.generate(&prompt, TRIAL_ANALYST_SYSTEM).await {
            Ok(response) => {
                responses.push(response);
                store.save_responses(&keyword, &responses).await?;
            }
            Err(e) => {
                warn!("Generation failed for pages {first} to {last}, skipping batch: {e}");
                failed_generations += 1;
                last_generation_error = Some(e);
            }
        }
    }

    if responses.is_empty() {
        if let Some(e) = last_generation_error {
            return Err(AppError::Llm(format!(
                "all {failed_generations} generation call(s) failed, last error: {e}"
            )));
        }
    }

    let parsed = ResponseParser::new(options.filter).parse(&responses);
    info!(
        "Parsed {} trial(s) and {} group(s) from {} response(s)",
        parsed.trial_count(),
        parsed.group_count(),
        responses.len()
    );

    let csv_path = if parsed.identities.is_empty() {
        info!("No data to save");
        None
    } else {
        let document = format_csv(&parsed).map_err(anyhow::Error::from)?;
        let path = store.save_csv(&keyword, &document).await?;
        Some(path.display().to_string())
    };

    Ok(RunSummary {
        run_id,
        keyword,
        started_at,
        pages_requested: options.num_pages,
        trials_scraped: scraped.len(),
        responses: responses.len(),
        trials_parsed: parsed.trial_count(),
        groups_parsed: parsed.group_count(),
        csv_path,
    })
}
