//! Thin client for the local generate endpoint. The model service is
//! treated as an opaque collaborator: prompt in, free-form text out, and
//! every transport or decode problem is an ordinary error for the caller.

use std::time::Duration;

use anyhow::anyhow;
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::{AppError, AppResult},
    server_config::cfg,
    HttpClient,
};

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    models: Vec<ModelTag>,
}

fn endpoint(path: &str) -> String {
    format!("{}{}", cfg.model.endpoint.trim_end_matches('/'), path)
}

/// Run one generation request against `model`, asking for JSON-formatted
/// output. Bounded by the configured timeout so a stuck model degrades the
/// caller instead of hanging it.
pub async fn generate(http_client: &HttpClient, model: &str, prompt: &str) -> AppResult<String> {
    let request = http_client
        .post(endpoint("/api/generate"))
        .json(&json!({
            "model": model,
            "prompt": prompt,
            "stream": false,
            "format": "json",
            "options": {
                "temperature": cfg.model.temperature
            }
        }))
        .send();

    let resp = tokio::time::timeout(Duration::from_secs(cfg.model.timeout_secs), request)
        .await
        .map_err(|_| AppError::RequestTimeout)??;

    if !resp.status().is_success() {
        return Err(anyhow!("model endpoint returned status {}", resp.status()).into());
    }

    let parsed = resp.json::<GenerateResponse>().await?;
    Ok(parsed.response)
}

/// List the models the endpoint serves. Used by the health check as a
/// reachability probe.
pub async fn list_models(http_client: &HttpClient) -> AppResult<Vec<String>> {
    let resp = http_client
        .get(endpoint("/api/tags"))
        .timeout(Duration::from_secs(5))
        .send()
        .await?;

    if !resp.status().is_success() {
        return Err(anyhow!("model endpoint returned status {}", resp.status()).into());
    }

    let parsed = resp.json::<TagsResponse>().await?;
    Ok(parsed.models.into_iter().map(|m| m.name).collect())
}
