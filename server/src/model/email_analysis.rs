use anyhow::anyhow;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::IntoActiveModel;
use serde::Serialize;

use crate::{db_core::prelude::*, error::AppResult};

pub struct EmailAnalysisCtrl;

/// Row projection for the recent-analyses slice of the stats view.
#[derive(Debug, Clone, FromQueryResult, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentAnalysis {
    pub mailbox: String,
    pub email_id: String,
    pub summary: Option<String>,
    pub priority_score: i32,
    pub is_phishing: bool,
    pub analyzed_at: DateTimeWithTimeZone,
}

#[derive(Debug, FromQueryResult)]
struct AvgProcessingTime {
    avg_time: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisStats {
    pub total_analyzed: u64,
    pub phishing_detected: u64,
    pub avg_processing_time: f64,
    pub recent_analyses: Vec<RecentAnalysis>,
}

impl EmailAnalysisCtrl {
    /// Overwrite-on-conflict write keyed by `(mailbox, email_id)`. Re-analysis
    /// replaces the previous record instead of failing or duplicating.
    pub async fn upsert(
        conn: &DatabaseConnection,
        record: email_analysis::Model,
    ) -> AppResult<email_analysis::Model> {
        let mailbox = record.mailbox.clone();
        let email_id = record.email_id.clone();

        let mut active = record.into_active_model();
        active.id = ActiveValue::NotSet;

        EmailAnalysis::insert(active)
            .on_conflict(
                OnConflict::columns([
                    email_analysis::Column::Mailbox,
                    email_analysis::Column::EmailId,
                ])
                .update_columns([
                    email_analysis::Column::Summary,
                    email_analysis::Column::Categories,
                    email_analysis::Column::PriorityScore,
                    email_analysis::Column::IsPhishing,
                    email_analysis::Column::PhishingScore,
                    email_analysis::Column::SensitiveData,
                    email_analysis::Column::AutoReplySuggestion,
                    email_analysis::Column::ProcessingTime,
                    email_analysis::Column::AnalyzedAt,
                    email_analysis::Column::ConversationId,
                    email_analysis::Column::Tasks,
                    email_analysis::Column::Meeting,
                    email_analysis::Column::Tone,
                    email_analysis::Column::SentimentScore,
                    email_analysis::Column::Language,
                    email_analysis::Column::Entities,
                    email_analysis::Column::SmartReplies,
                    email_analysis::Column::ThreadContext,
                    email_analysis::Column::PredictedResponseMinutes,
                    email_analysis::Column::ModelUsed,
                    email_analysis::Column::Error,
                ])
                .to_owned(),
            )
            .exec(conn)
            .await?;

        Self::find_by_key(conn, &mailbox, &email_id)
            .await?
            .ok_or_else(|| anyhow!("upserted record {}/{} not found", mailbox, email_id).into())
    }

    pub async fn find_by_key(
        conn: &DatabaseConnection,
        mailbox: &str,
        email_id: &str,
    ) -> AppResult<Option<email_analysis::Model>> {
        let found = EmailAnalysis::find()
            .filter(email_analysis::Column::Mailbox.eq(mailbox))
            .filter(email_analysis::Column::EmailId.eq(email_id))
            .one(conn)
            .await?;

        Ok(found)
    }

    /// Case-insensitive keyword match over the model-written text fields,
    /// newest first.
    pub async fn search(
        conn: &DatabaseConnection,
        query: &str,
        limit: u64,
    ) -> AppResult<Vec<email_analysis::Model>> {
        let pattern = format!("%{}%", query);

        let results = EmailAnalysis::find()
            .filter(
                Condition::any()
                    .add(Expr::col(email_analysis::Column::Summary).ilike(pattern.clone()))
                    .add(Expr::col(email_analysis::Column::ThreadContext).ilike(pattern.clone()))
                    .add(Expr::col(email_analysis::Column::AutoReplySuggestion).ilike(pattern)),
            )
            .order_by_desc(email_analysis::Column::AnalyzedAt)
            .limit(limit)
            .all(conn)
            .await?;

        Ok(results)
    }

    pub async fn find_by_conversation(
        conn: &DatabaseConnection,
        conversation_id: &str,
    ) -> AppResult<Vec<email_analysis::Model>> {
        let results = EmailAnalysis::find()
            .filter(email_analysis::Column::ConversationId.eq(conversation_id))
            .order_by_desc(email_analysis::Column::AnalyzedAt)
            .all(conn)
            .await?;

        Ok(results)
    }

    pub async fn stats(conn: &DatabaseConnection) -> AppResult<AnalysisStats> {
        let total_analyzed = EmailAnalysis::find().count(conn).await?;
        let phishing_detected = EmailAnalysis::find()
            .filter(email_analysis::Column::IsPhishing.eq(true))
            .count(conn)
            .await?;

        let avg_processing_time = EmailAnalysis::find()
            .select_only()
            .column_as(Expr::cust("AVG(processing_time)"), "avg_time")
            .into_model::<AvgProcessingTime>()
            .one(conn)
            .await?
            .and_then(|row| row.avg_time)
            .unwrap_or(0.0);

        let recent_analyses = EmailAnalysis::find()
            .select_only()
            .column(email_analysis::Column::Mailbox)
            .column(email_analysis::Column::EmailId)
            .column(email_analysis::Column::Summary)
            .column(email_analysis::Column::PriorityScore)
            .column(email_analysis::Column::IsPhishing)
            .column(email_analysis::Column::AnalyzedAt)
            .order_by_desc(email_analysis::Column::AnalyzedAt)
            .limit(10)
            .into_model::<RecentAnalysis>()
            .all(conn)
            .await?;

        Ok(AnalysisStats {
            total_analyzed,
            phishing_detected,
            avg_processing_time,
            recent_analyses,
        })
    }
}

#[cfg(test)]
#[cfg(feature = "integration")]
mod tests {
    use super::*;
    use crate::state::pipeline::build_record;
    use crate::testing::common::{sample_signal_report, setup};
    use serde_json::json;

    #[tokio::test]
    async fn test_upsert_overwrites_instead_of_duplicating() {
        let (conn, _) = setup().await;

        let first = build_record(
            "it@example.com",
            "upsert-test",
            sample_signal_report(),
            Err(crate::error::AppError::RequestTimeout),
            "balanced-model",
            0.1,
        );
        let second = {
            let mut r = build_record(
                "it@example.com",
                "upsert-test",
                sample_signal_report(),
                Err(crate::error::AppError::RequestTimeout),
                "balanced-model",
                0.2,
            );
            r.priority_score = 9;
            r
        };

        EmailAnalysisCtrl::upsert(&conn, first).await.unwrap();
        let stored = EmailAnalysisCtrl::upsert(&conn, second).await.unwrap();

        assert_eq!(stored.priority_score, 9);
        assert_eq!(stored.categories, json!([]));

        let count = EmailAnalysis::find()
            .filter(email_analysis::Column::Mailbox.eq("it@example.com"))
            .filter(email_analysis::Column::EmailId.eq("upsert-test"))
            .count(&conn)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
