//! Axum route handlers for searching and running the full pipeline.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::pipeline::runner::{run_pipeline, RunOptions, RunSummary};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TotalPagesQuery {
    pub keyword: String,
}

#[derive(Debug, Serialize)]
pub struct TotalPagesResponse {
    pub keyword: String,
    pub total_pages: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct RunRequest {
    pub keyword: String,
    pub num_pages: u32,
}

/// GET /api/v1/search/pages?keyword=
pub async fn handle_total_pages(
    State(state): State<AppState>,
    Query(query): Query<TotalPagesQuery>,
) -> Result<Json<TotalPagesResponse>, AppError> {
    let keyword = query.keyword.trim().to_string();
    if keyword.is_empty() {
        return Err(AppError::Validation("keyword must not be empty".to_string()));
    }

    let total_pages = state
        .source
        .total_pages(&keyword)
        .await
        .map_err(|e| AppError::Retrieval(e.to_string()))?;

    Ok(Json(TotalPagesResponse {
        keyword,
        total_pages,
    }))
}

/// POST /api/v1/runs
///
/// Runs synchronously; the response arrives once every batch is done.
pub async fn handle_run(
    State(state): State<AppState>,
    Json(req): Json<RunRequest>,
) -> Result<Json<RunSummary>, AppError> {
    let options = RunOptions {
        keyword: req.keyword,
        num_pages: req.num_pages,
        batch_size: state.config.page_batch_size,
        filter: state.config.degenerate_filter,
    };

    let summary = run_pipeline(
        state.source.as_ref(),
        state.generator.as_ref(),
        &state.store,
        options,
    )
    .await?;

    Ok(Json(summary))
}
