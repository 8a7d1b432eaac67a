use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::dates;

pub const MAX_TASKS: usize = 5;
const MAX_DESCRIPTION_LEN: usize = 200;

static RE_ACTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:please|could you|can you|would you|need to|needs to|make sure to|don't forget to|remember to)\s+([^.!?\n]{3,200})",
    )
    .unwrap()
});
static RE_TODO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:todo|to-do|action item)s?\s*[:\-]\s*([^.!?\n]{3,200})").unwrap()
});
static RE_DEADLINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:due|deadline)(?:\s+(?:by|is|on))?\s+([^.!?\n]{3,60})").unwrap()
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedTask {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    pub priority: i32,
}

/// Action-request phrasing, todo/action-item markers and standalone
/// deadline phrasing each yield a task. A deadline phrase inside an
/// already-captured request does not produce a second task. Capped at five.
pub fn extract(text: &str, priority: i32, now: DateTime<Utc>) -> Vec<ExtractedTask> {
    let mut tasks: Vec<ExtractedTask> = Vec::new();
    let mut spans: Vec<(usize, usize)> = Vec::new();

    for caps in RE_ACTION
        .captures_iter(text)
        .chain(RE_TODO.captures_iter(text))
    {
        let whole = caps.get(0).unwrap();
        let description = truncate(caps.get(1).unwrap().as_str().trim());
        if tasks.iter().any(|t| t.description == description) {
            continue;
        }
        spans.push((whole.start(), whole.end()));
        tasks.push(ExtractedTask {
            description,
            deadline: dates::extract_deadline(whole.as_str(), now),
            priority,
        });
        if tasks.len() >= MAX_TASKS {
            return tasks;
        }
    }

    for caps in RE_DEADLINE.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        let covered = spans
            .iter()
            .any(|(start, end)| whole.start() < *end && whole.end() > *start);
        if covered {
            continue;
        }
        let description = truncate(whole.as_str().trim());
        if tasks.iter().any(|t| t.description == description) {
            continue;
        }
        tasks.push(ExtractedTask {
            description,
            deadline: dates::extract_deadline(whole.as_str(), now),
            priority,
        });
        if tasks.len() >= MAX_TASKS {
            break;
        }
    }

    tasks
}

fn truncate(s: &str) -> String {
    s.chars().take(MAX_DESCRIPTION_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 7, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_single_request_with_relative_deadline() {
        let now = instant();
        let tasks = extract("please send the report by tomorrow", 5, now);

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].description, "send the report by tomorrow");
        assert_eq!(tasks[0].deadline, Some(now + Duration::days(1)));
        assert_eq!(tasks[0].priority, 5);
    }

    #[test]
    fn test_todo_marker() {
        let tasks = extract("TODO: update the changelog before release", 4, instant());
        assert_eq!(tasks.len(), 1);
        assert!(tasks[0].description.starts_with("update the changelog"));
    }

    #[test]
    fn test_standalone_deadline_phrase() {
        let tasks = extract("The quarterly filing is due 2025-09-01.", 5, instant());
        assert_eq!(tasks.len(), 1);
        assert!(tasks[0].deadline.is_some());
    }

    #[test]
    fn test_cap_at_five() {
        let text = "please do one thing. please do two things. please do three things. \
                    please do four things. please do five things. please do six things.";
        let tasks = extract(text, 5, instant());
        assert_eq!(tasks.len(), MAX_TASKS);
    }

    #[test]
    fn test_description_truncated() {
        let long = format!("please {}", "x".repeat(400));
        let tasks = extract(&long, 5, instant());
        assert_eq!(tasks[0].description.chars().count(), 200);
    }

    #[test]
    fn test_no_tasks() {
        assert!(extract("just saying hello", 5, instant()).is_empty());
    }
}
