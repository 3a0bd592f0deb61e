//! Axum route handlers for parsing already-generated responses.

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::export::format_csv;
use crate::parsing::parser::parse_responses;
use crate::parsing::{DegenerateFilter, ParsedResultSet};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ParseResponsesRequest {
    pub responses: Vec<String>,
    /// Overrides the configured policy for this request.
    #[serde(default)]
    pub degenerate_filter: Option<DegenerateFilter>,
}

fn parse_request(state: &AppState, req: &ParseResponsesRequest) -> ParsedResultSet {
    let filter = req.degenerate_filter.unwrap_or(state.config.degenerate_filter);
    let parsed = parse_responses(&req.responses, filter);
    info!(
        "Parsed {} response(s): {} trial(s), {} group(s)",
        req.responses.len(),
        parsed.trial_count(),
        parsed.group_count()
    );
    parsed
}

/// POST /api/v1/responses/parse
pub async fn handle_parse(
    State(state): State<AppState>,
    Json(req): Json<ParseResponsesRequest>,
) -> Json<ParsedResultSet> {
    Json(parse_request(&state, &req))
}

/// POST /api/v1/responses/csv
pub async fn handle_parse_csv(
    State(state): State<AppState>,
    Json(req): Json<ParseResponsesRequest>,
) -> Result<impl IntoResponse, AppError> {
    let parsed = parse_request(&state, &req);
    let document = format_csv(&parsed).map_err(anyhow::Error::from)?;
    Ok((
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        document,
    ))
}
