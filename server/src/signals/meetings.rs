use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::Display;

use super::dates;

pub const MAX_TIMES: usize = 3;

const MEETING_KEYWORDS: &[&str] = &[
    "meeting",
    "call",
    "sync",
    "catch up",
    "schedule",
    "appointment",
    "discussion",
    "demo",
    "interview",
    "standup",
];
const VIRTUAL_KEYWORDS: &[&str] = &[
    "zoom",
    "google meet",
    "meet.google",
    "teams",
    "webex",
    "skype",
    "hangout",
    "video call",
];

static RE_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b\d{1,2}(?::\d{2})?\s*(?:am|pm)\b|\b\d{1,2}:\d{2}\b").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MeetingType {
    Virtual,
    InPerson,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingProposal {
    pub meeting_type: MeetingType,
    pub times: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposed_date: Option<DateTime<Utc>>,
}

/// Meeting detection is gated on a keyword hit; a keyword alone is not
/// enough — at least one time-of-day or a date must also be present.
pub fn extract(text: &str, now: DateTime<Utc>) -> Option<MeetingProposal> {
    let lower = text.to_lowercase();
    if !MEETING_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return None;
    }

    let times: Vec<String> = RE_TIME
        .find_iter(text)
        .take(MAX_TIMES)
        .map(|m| m.as_str().trim().to_string())
        .collect();
    let proposed_date = dates::extract_deadline(text, now);

    if times.is_empty() && proposed_date.is_none() {
        return None;
    }

    let meeting_type = if VIRTUAL_KEYWORDS.iter().any(|k| lower.contains(k)) {
        MeetingType::Virtual
    } else {
        MeetingType::InPerson
    };

    Some(MeetingProposal {
        meeting_type,
        times,
        proposed_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 7, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_virtual_meeting_with_time() {
        let proposal = extract(
            "Can we schedule a zoom call at 3pm tomorrow?",
            instant(),
        )
        .unwrap();

        assert_eq!(proposal.meeting_type, MeetingType::Virtual);
        assert_eq!(proposal.times, vec!["3pm"]);
        assert!(proposal.proposed_date.is_some());
    }

    #[test]
    fn test_in_person_meeting() {
        let proposal = extract("Team meeting in the main office at 10:30", instant()).unwrap();
        assert_eq!(proposal.meeting_type, MeetingType::InPerson);
        assert_eq!(proposal.times, vec!["10:30"]);
    }

    #[test]
    fn test_keyword_without_time_or_date_is_none() {
        assert!(extract("We should have a meeting about this", instant()).is_none());
    }

    #[test]
    fn test_no_keyword_is_none() {
        assert!(extract("Lunch at 1pm was lovely", instant()).is_none());
    }

    #[test]
    fn test_times_capped_at_three() {
        let proposal = extract(
            "Meeting options: 9am, 10am, 11am or 1pm work for me",
            instant(),
        )
        .unwrap();
        assert_eq!(proposal.times.len(), MAX_TIMES);
    }
}
