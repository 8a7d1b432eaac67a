//! Heuristic priority, available before the model answers. Feeds task
//! inheritance, the reply bank tier and the response-time prediction; the
//! model's own priority score wins in the persisted record.

pub const DEFAULT_PRIORITY: i32 = 5;

const STRONG: &[&str] = &["urgent", "asap", "immediately", "critical", "emergency"];
const MILD: &[&str] = &[
    "as soon as possible",
    "end of day",
    "eod",
    "right away",
    "deadline",
    "time sensitive",
];
const RELAXED: &[&str] = &["no rush", "no hurry", "whenever", "fyi"];

pub fn score(text: &str) -> i32 {
    let lower = text.to_lowercase();
    let mut score = DEFAULT_PRIORITY;

    if STRONG.iter().any(|k| lower.contains(k)) {
        score += 3;
    } else if MILD.iter().any(|k| lower.contains(k)) {
        score += 1;
    }
    if RELAXED.iter().any(|k| lower.contains(k)) {
        score -= 2;
    }

    score.clamp(1, 10)
}
