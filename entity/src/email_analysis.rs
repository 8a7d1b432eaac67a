//! One row per analyzed message, unique on `(mailbox, email_id)`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "email_analysis")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    #[serde(skip_deserializing)]
    pub id: i32,
    pub mailbox: String,
    pub email_id: String,
    pub summary: Option<String>,
    pub categories: Json,
    pub priority_score: i32,
    pub is_phishing: bool,
    pub phishing_score: f32,
    pub sensitive_data: bool,
    pub auto_reply_suggestion: Option<String>,
    pub processing_time: f64,
    pub analyzed_at: DateTimeWithTimeZone,
    pub conversation_id: String,
    pub tasks: Json,
    pub meeting: Option<Json>,
    pub tone: String,
    pub sentiment_score: f32,
    pub language: String,
    pub entities: Json,
    pub smart_replies: Json,
    pub thread_context: Option<String>,
    pub predicted_response_minutes: i32,
    pub model_used: String,
    pub error: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
