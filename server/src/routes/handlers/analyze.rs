//! On-demand single-message analysis. Shares the pipeline with the batch
//! scheduler; only the entry point differs.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::{
    db_core::prelude::*,
    error::{AppError, AppJsonResult},
    model::{email_analysis::EmailAnalysisCtrl, mailbox::MailboxCtrl},
    state::pipeline::{AnalysisPipeline, ProcessOutcome},
    ServerState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub mailbox: String,
    pub email_id: String,
    #[serde(default)]
    pub force: bool,
}

/// # POST /analyze
///
/// Analyze one message by mailbox address and message id. Returns the
/// persisted record; with a live dedup marker and no `force` flag the
/// existing record is returned untouched.
pub async fn analyze_email(
    State(state): State<ServerState>,
    Json(request): Json<AnalyzeRequest>,
) -> AppJsonResult<email_analysis::Model> {
    validate(&request)?;

    let mailbox = MailboxCtrl::find_by_address(&state.conn, &request.mailbox)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Unknown mailbox {}", request.mailbox)))?;

    let path = state
        .mail_store
        .message_path(&mailbox.maildir, &request.email_id);

    let pipeline = AnalysisPipeline::new(
        state.conn.clone(),
        state.http_client.clone(),
        state.dedup_store.clone(),
        state.mail_store.clone(),
    );

    match pipeline
        .process(&mailbox.address, &request.email_id, &path, request.force)
        .await?
    {
        ProcessOutcome::Analyzed(record) => Ok(Json(record)),
        ProcessOutcome::Skipped => {
            let record = EmailAnalysisCtrl::find_by_key(&state.conn, &mailbox.address, &request.email_id)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!(
                        "{}/{} was marked as processed but no record exists; retry with force",
                        mailbox.address, request.email_id
                    ))
                })?;
            Ok(Json(record))
        }
    }
}

/// # GET /analysis/{mailbox}/{email_id}
///
/// Read-only fetch of a persisted record; never triggers analysis.
pub async fn get_analysis(
    State(state): State<ServerState>,
    Path((mailbox, email_id)): Path<(String, String)>,
) -> AppJsonResult<email_analysis::Model> {
    let record = EmailAnalysisCtrl::find_by_key(&state.conn, &mailbox, &email_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No analysis for {}/{}", mailbox, email_id)))?;

    Ok(Json(record))
}

fn validate(request: &AnalyzeRequest) -> Result<(), AppError> {
    if request.mailbox.trim().is_empty() || !request.mailbox.contains('@') {
        return Err(AppError::BadRequest(
            "mailbox must be a non-empty address".to_string(),
        ));
    }
    // message ids are maildir filenames, never paths
    if request.email_id.trim().is_empty()
        || request.email_id.contains('/')
        || request.email_id.contains("..")
    {
        return Err(AppError::BadRequest(
            "emailId must be a plain message file name".to_string(),
        ));
    }
    Ok(())
}
