//! Reporting views over persisted analysis records.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::{
    db_core::prelude::*,
    error::AppJsonResult,
    model::email_analysis::{AnalysisStats, EmailAnalysisCtrl},
    ServerState,
};

/// # GET /stats
///
/// Processing statistics: totals, phishing detections, average processing
/// time and the ten most recent analyses.
pub async fn get_stats(State(state): State<ServerState>) -> AppJsonResult<AnalysisStats> {
    let stats = EmailAnalysisCtrl::stats(&state.conn).await?;
    Ok(Json(stats))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub conversation_id: String,
    pub total: usize,
    pub messages: Vec<email_analysis::Model>,
}

/// # GET /conversations/{conversation_id}
///
/// Every analyzed message sharing one conversation id, newest first.
pub async fn get_conversation(
    State(state): State<ServerState>,
    Path(conversation_id): Path<String>,
) -> AppJsonResult<ConversationResponse> {
    let messages = EmailAnalysisCtrl::find_by_conversation(&state.conn, &conversation_id).await?;

    Ok(Json(ConversationResponse {
        total: messages.len(),
        conversation_id,
        messages,
    }))
}
