//! Keyword search over analyzed records.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::{
    db_core::prelude::*,
    error::{AppError, AppJsonResult},
    model::email_analysis::EmailAnalysisCtrl,
    ServerState,
};

const DEFAULT_SEARCH_LIMIT: u64 = 10;
const MAX_SEARCH_LIMIT: u64 = 50;
const MIN_QUERY_LENGTH: usize = 3;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    /// The search query string
    pub q: String,
    /// Maximum number of results (default: 10, max: 50)
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<email_analysis::Model>,
    pub query: String,
    pub total: usize,
}

/// # GET /search
///
/// Case-insensitive keyword match over summaries, thread context and reply
/// suggestions, newest first.
pub async fn search(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> AppJsonResult<SearchResponse> {
    if query.q.trim().len() < MIN_QUERY_LENGTH {
        return Err(AppError::BadRequest(format!(
            "Query must be at least {} characters",
            MIN_QUERY_LENGTH
        )));
    }

    let limit = query
        .limit
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .min(MAX_SEARCH_LIMIT);

    let results = EmailAnalysisCtrl::search(&state.conn, query.q.trim(), limit).await?;
    let total = results.len();

    Ok(Json(SearchResponse {
        results,
        query: query.q,
        total,
    }))
}
