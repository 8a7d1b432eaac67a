use anyhow::anyhow;
use indoc::formatdoc;
use serde::Deserialize;

use crate::email::NormalizedMessage;
use crate::error::{AppError, AppResult};
use crate::signals::SignalReport;
use crate::HttpClient;

use super::ollama;

/// Fields only the model produces. Everything defaults so a sparse but
/// valid JSON reply still parses; a reply that is not valid JSON at all is
/// rejected wholesale and the caller degrades.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LlmAnalysis {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default = "default_priority")]
    pub priority_score: i64,
    #[serde(default)]
    pub is_phishing: bool,
    #[serde(default)]
    pub phishing_score: f32,
    #[serde(default)]
    pub sensitive_data: bool,
    #[serde(default)]
    pub auto_reply_suggestion: Option<String>,
    #[serde(default)]
    pub thread_context: Option<String>,
}

fn default_priority() -> i64 {
    5
}

impl LlmAnalysis {
    /// Clamp model output into the record invariants regardless of what the
    /// model claimed.
    pub fn clamped(mut self) -> Self {
        self.priority_score = self.priority_score.clamp(1, 10);
        self.phishing_score = self.phishing_score.clamp(0.0, 1.0);
        self
    }
}

pub fn build_prompt(
    message: &NormalizedMessage,
    signals: &SignalReport,
    excerpt_limit: usize,
) -> String {
    let excerpt: String = message.body.chars().take(excerpt_limit).collect();

    formatdoc! {r#"
        Analyze the following email and provide a JSON response with these fields:
        - summary: A brief 2-3 sentence summary of the email
        - categories: List of relevant categories (e.g., "work", "personal", "finance", "social", "newsletter", "urgent")
        - priority_score: Integer from 1-10 indicating urgency (1=low, 10=critical)
        - is_phishing: Boolean indicating if this appears to be a phishing attempt
        - phishing_score: Float from 0.0-1.0 indicating phishing likelihood
        - sensitive_data: Boolean indicating if the email contains sensitive information (passwords, credit cards, SSN, etc.)
        - auto_reply_suggestion: A brief suggested auto-reply if appropriate, or null
        - thread_context: One sentence placing this message in its conversation, or null

        Email:
        Subject: {subject}
        From: {from}
        To: {to}
        Date: {date}
        Detected language: {language}
        Detected tone: {tone}

        Body:
        {excerpt}

        Respond ONLY with valid JSON, no additional text."#,
        subject = message.subject,
        from = message.from,
        to = message.to,
        date = message.date,
        language = signals.language,
        tone = signals.tone,
        excerpt = excerpt,
    }
}

/// One model round-trip: build the prompt, call the generate endpoint and
/// parse the reply. Transport errors, timeouts and unparseable output all
/// come back as errors for the degraded-mode merge to absorb.
pub async fn run_analysis(
    http_client: &HttpClient,
    model: &str,
    message: &NormalizedMessage,
    signals: &SignalReport,
    excerpt_limit: usize,
) -> AppResult<LlmAnalysis> {
    let prompt = build_prompt(message, signals, excerpt_limit);
    let raw = ollama::generate(http_client, model, &prompt).await?;

    let parsed: LlmAnalysis = serde_json::from_str(raw.trim()).map_err(|e| {
        AppError::Internal(anyhow!("model returned unparseable analysis JSON: {}", e))
    })?;

    Ok(parsed.clamped())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_reply() {
        let raw = r#"{
            "summary": "Quarterly report request.",
            "categories": ["work", "urgent"],
            "priority_score": 8,
            "is_phishing": false,
            "phishing_score": 0.05,
            "sensitive_data": false,
            "auto_reply_suggestion": "Will send it over today.",
            "thread_context": "Follow-up on last week's report request."
        }"#;

        let parsed: LlmAnalysis = serde_json::from_str(raw).unwrap();
        let parsed = parsed.clamped();

        assert_eq!(parsed.summary.as_deref(), Some("Quarterly report request."));
        assert_eq!(parsed.categories, vec!["work", "urgent"]);
        assert_eq!(parsed.priority_score, 8);
        assert!(!parsed.is_phishing);
    }

    #[test]
    fn test_sparse_reply_gets_defaults() {
        let parsed: LlmAnalysis = serde_json::from_str(r#"{"summary": "Hi."}"#).unwrap();
        let parsed = parsed.clamped();

        assert_eq!(parsed.priority_score, 5);
        assert!(parsed.categories.is_empty());
        assert!(!parsed.is_phishing);
        assert_eq!(parsed.phishing_score, 0.0);
    }

    #[test]
    fn test_out_of_range_scores_are_clamped() {
        let parsed: LlmAnalysis =
            serde_json::from_str(r#"{"priority_score": 99, "phishing_score": 3.5}"#).unwrap();
        let parsed = parsed.clamped();

        assert_eq!(parsed.priority_score, 10);
        assert_eq!(parsed.phishing_score, 1.0);
    }

    #[test]
    fn test_non_json_reply_is_rejected() {
        let result = serde_json::from_str::<LlmAnalysis>("I think this email is about...");
        assert!(result.is_err());
    }

    #[test]
    fn test_prompt_embeds_metadata_and_caps_excerpt() {
        use crate::email::NormalizedMessage;
        use crate::signals;
        use chrono::{TimeZone, Utc};

        let message = NormalizedMessage {
            subject: "Budget".to_string(),
            from: "a@x.com".to_string(),
            to: "b@x.com".to_string(),
            date: "2025-08-07T09:00:00Z".to_string(),
            body: "x".repeat(4000),
        };
        let now = Utc.with_ymd_and_hms(2025, 8, 7, 9, 0, 0).unwrap();
        let report = signals::extract(&message, now);

        let prompt = build_prompt(&message, &report, 2000);

        assert!(prompt.contains("Subject: Budget"));
        assert!(prompt.contains("From: a@x.com"));
        assert!(prompt.contains("Detected language: english"));
        assert!(prompt.contains(&"x".repeat(2000)));
        assert!(!prompt.contains(&"x".repeat(2001)));
    }
}
