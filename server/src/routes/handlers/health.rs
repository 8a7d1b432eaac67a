use axum::{extract::State, Json};
use serde::Serialize;

use crate::{error::AppJsonResult, prompt::ollama, server_config::cfg, ServerState};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub mail_store: &'static str,
    pub cache: &'static str,
    pub model: &'static str,
    pub model_id: String,
}

fn status_str(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "error"
    }
}

/// # GET /health
///
/// Aggregate reachability of the datastore, the mail storage root, the
/// dedup cache and the model endpoint. Any failing collaborator flips the
/// overall status to degraded; the endpoint itself never errors.
pub async fn health_check(State(state): State<ServerState>) -> AppJsonResult<HealthResponse> {
    let database = state.conn.ping().await.is_ok();
    let mail_store = state.mail_store.root_exists();
    // the in-process marker store has no failure mode beyond the process itself
    let cache = true;
    let model = ollama::list_models(&state.http_client).await.is_ok();

    let healthy = database && mail_store && cache && model;

    Ok(Json(HealthResponse {
        status: if healthy { "healthy" } else { "degraded" },
        database: status_str(database),
        mail_store: status_str(mail_store),
        cache: status_str(cache),
        model: status_str(model),
        model_id: cfg.model.profiles.balanced.clone(),
    }))
}
