pub const DEFAULT_LANGUAGE: &str = "english";

const SCAN_WORDS: usize = 100;
const MIN_MATCHES: usize = 3;

/// Candidate languages with their marker words. List order is the
/// deterministic tie-break: the first language to reach the best count wins.
const LANGUAGES: &[(&str, &[&str])] = &[
    (
        "english",
        &[
            "the", "and", "is", "are", "was", "to", "of", "that", "this", "with", "have", "for",
            "you", "not",
        ],
    ),
    (
        "spanish",
        &[
            "el", "la", "los", "las", "que", "es", "en", "una", "por", "con", "para", "gracias",
            "hola", "está",
        ],
    ),
    (
        "french",
        &[
            "le", "les", "des", "et", "est", "une", "que", "pour", "dans", "vous", "nous", "merci",
            "bonjour", "avec",
        ],
    ),
    (
        "german",
        &[
            "der", "die", "das", "und", "ist", "nicht", "mit", "für", "auf", "ein", "eine", "sie",
            "danke", "wir",
        ],
    ),
    (
        "portuguese",
        &[
            "o", "os", "uma", "que", "não", "em", "do", "da", "para", "com", "obrigado", "você",
            "olá", "bom",
        ],
    ),
];

/// Guess the language from the first 100 words. Returns the default unless
/// the best candidate has at least three marker hits.
pub fn detect(text: &str) -> &'static str {
    let words: Vec<String> = text
        .split_whitespace()
        .take(SCAN_WORDS)
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .collect();

    let mut best = DEFAULT_LANGUAGE;
    let mut best_count = 0;
    for &(language, markers) in LANGUAGES {
        let count = words
            .iter()
            .filter(|w| markers.contains(&w.as_str()))
            .count();
        if count > best_count {
            best = language;
            best_count = count;
        }
    }

    if best_count >= MIN_MATCHES {
        best
    } else {
        DEFAULT_LANGUAGE
    }
}
