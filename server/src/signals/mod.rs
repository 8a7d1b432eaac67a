//! Deterministic heuristic extractors. Each one is a pure function over the
//! normalized message text and an explicit analysis instant; none of them
//! share state, so they can run in any order.

pub mod dates;
pub mod entities;
pub mod language;
pub mod meetings;
pub mod replies;
pub mod response_time;
pub mod tasks;
pub mod thread;
pub mod tone;
pub mod urgency;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::email::NormalizedMessage;

pub use meetings::MeetingProposal;
pub use tasks::ExtractedTask;

/// Combined, immutable output of one extractor pass.
#[derive(Debug, Clone)]
pub struct SignalReport {
    pub conversation_id: String,
    pub language: &'static str,
    pub tone: &'static str,
    pub sentiment_score: f32,
    pub urgency: i32,
    pub entities: IndexMap<&'static str, Vec<String>>,
    pub tasks: Vec<ExtractedTask>,
    pub meeting: Option<MeetingProposal>,
    pub smart_replies: Vec<String>,
    pub predicted_response_minutes: i32,
}

pub fn extract(message: &NormalizedMessage, now: DateTime<Utc>) -> SignalReport {
    let text = format!("{} {}", message.subject, message.body);

    let conversation_id = thread::conversation_id(&message.subject, &message.from, &message.to);
    let language = language::detect(&message.body);
    let (tone, sentiment_score) = tone::analyze(&text);
    let urgency = urgency::score(&text);
    let entities = entities::extract(&text);
    let tasks = tasks::extract(&text, urgency, now);
    let meeting = meetings::extract(&text, now);
    let smart_replies = replies::suggest(urgency, meeting.is_some(), !tasks.is_empty(), tone);
    let predicted_response_minutes = response_time::predict(urgency, meeting.is_some(), tasks.len());

    SignalReport {
        conversation_id,
        language,
        tone,
        sentiment_score,
        urgency,
        entities,
        tasks,
        meeting,
        smart_replies,
        predicted_response_minutes,
    }
}
