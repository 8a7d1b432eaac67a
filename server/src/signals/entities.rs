use indexmap::{IndexMap, IndexSet};
use once_cell::sync::Lazy;
use regex::Regex;

pub const MAX_PER_CATEGORY: usize = 10;

static RE_EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());
static RE_PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\+?\d{1,3}[-.\s]?\(?\d{2,4}\)?[-.\s]?\d{3,4}[-.\s]\d{3,4}\b").unwrap()
});
static RE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://(www\.)?[-a-zA-Z0-9@:%._\+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b([-a-zA-Z0-9()@:%_\+.~#?&//=]*)").unwrap()
});
static RE_DATE_NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\b|\b\d{4}-\d{1,2}-\d{1,2}\b").unwrap());
static RE_DATE_MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:january|february|march|april|may|june|july|august|september|october|november|december)\s+\d{1,2}(?:st|nd|rd|th)?(?:,?\s+\d{4})?\b").unwrap()
});
static RE_PROPER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)+\b").unwrap());

const ORG_SUFFIXES: &[&str] = &[
    "inc", "corp", "llc", "ltd", "company", "technologies", "solutions", "group", "systems",
    "labs", "industries", "software",
];

/// Regex-based named-entity pass. Every category is deduplicated in first-
/// seen order and capped at ten entries; categories are always present,
/// even when empty.
pub fn extract(text: &str) -> IndexMap<&'static str, Vec<String>> {
    let mut map = IndexMap::new();
    map.insert("emails", collect(&RE_EMAIL, text));
    map.insert("phones", collect(&RE_PHONE, text));
    map.insert("urls", collect(&RE_URL, text));

    let mut dates: IndexSet<String> = IndexSet::new();
    dates.extend(RE_DATE_NUMERIC.find_iter(text).map(|m| m.as_str().to_string()));
    dates.extend(RE_DATE_MONTH.find_iter(text).map(|m| m.as_str().to_string()));
    map.insert("dates", dates.into_iter().take(MAX_PER_CATEGORY).collect());

    let mut organizations: IndexSet<String> = IndexSet::new();
    let mut people: IndexSet<String> = IndexSet::new();
    for m in RE_PROPER.find_iter(text) {
        let candidate = m.as_str().to_string();
        let lower = candidate.to_lowercase();
        let is_org = ORG_SUFFIXES
            .iter()
            .any(|s| lower.split_whitespace().any(|w| w.starts_with(*s)));
        if is_org {
            organizations.insert(candidate);
        } else {
            people.insert(candidate);
        }
    }
    map.insert(
        "organizations",
        organizations.into_iter().take(MAX_PER_CATEGORY).collect(),
    );
    map.insert("people", people.into_iter().take(MAX_PER_CATEGORY).collect());

    map
}

fn collect(re: &Regex, text: &str) -> Vec<String> {
    let unique: IndexSet<String> = re
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .collect();
    unique.into_iter().take(MAX_PER_CATEGORY).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_and_splits_categories() {
        let text = "John Smith <john.smith@acme.com> from Acme Corp asked about \
                    https://acme.com/report due January 15, 2025. \
                    Call him at +1 555-123-4567.";
        let entities = extract(text);

        assert_eq!(entities["emails"], vec!["john.smith@acme.com"]);
        assert!(entities["urls"][0].starts_with("https://acme.com"));
        assert!(entities["dates"].iter().any(|d| d.contains("January 15")));
        assert!(!entities["phones"].is_empty());
        assert!(entities["organizations"].contains(&"Acme Corp".to_string()));
        assert!(entities["people"].contains(&"John Smith".to_string()));
    }

    #[test]
    fn test_all_categories_present_when_empty() {
        let entities = extract("nothing interesting here");
        for key in ["emails", "phones", "urls", "dates", "organizations", "people"] {
            assert!(entities.contains_key(key));
            assert!(entities[key].is_empty());
        }
    }

    #[test]
    fn test_dedup_and_cap() {
        let repeated = "a@b.com ".repeat(5);
        let many: String = (0..15).map(|i| format!("user{i}@example.com ")).collect();
        let entities = extract(&format!("{repeated} {many}"));

        assert_eq!(
            entities["emails"]
                .iter()
                .filter(|e| e.as_str() == "a@b.com")
                .count(),
            1
        );
        assert_eq!(entities["emails"].len(), MAX_PER_CATEGORY);
    }
}
