use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};

static RE_REPLY_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:(?:re|fw|fwd)(?:\[\d+\])?\s*:\s*)+").unwrap());

const ID_LEN: usize = 16;

/// Stable conversation identifier: reply/forward markers stripped from the
/// subject, participant pair lowercased and sorted so direction does not
/// matter, then hashed to a fixed-length hex id.
pub fn conversation_id(subject: &str, from: &str, to: &str) -> String {
    let subject = RE_REPLY_MARKER
        .replace(subject.trim(), "")
        .trim()
        .to_lowercase();

    let mut participants = [from.trim().to_lowercase(), to.trim().to_lowercase()];
    participants.sort();

    let mut hasher = Sha256::new();
    hasher.update(subject.as_bytes());
    hasher.update(b"|");
    hasher.update(participants.join(",").as_bytes());
    let digest = hasher.finalize();

    format!("{:x}", digest)[..ID_LEN].to_string()
}
