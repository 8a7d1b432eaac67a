const POSITIVE: &[&str] = &[
    "thank", "great", "appreciate", "excellent", "wonderful", "happy", "pleased", "congrat",
    "awesome", "glad",
];
const NEGATIVE: &[&str] = &[
    "problem", "issue", "error", "fail", "unfortunately", "concern", "wrong", "delay",
    "complaint", "disappoint", "broken",
];
const FORMAL: &[&str] = &[
    "dear", "sincerely", "regards", "respectfully", "kindly", "pursuant", "hereby", "attached",
];
const CASUAL: &[&str] = &[
    "hey", "yeah", "cool", "btw", "lol", "gonna", "wanna", "thx", "haha",
];

const TONE_THRESHOLD: usize = 2;

fn count_occurrences(text_lower: &str, keywords: &[&str]) -> usize {
    keywords.iter().map(|k| text_lower.matches(k).count()).sum()
}

/// Keyword-frequency tone and sentiment. Sentiment is `(p - n) / (p + n)`
/// over positive/negative keyword hits, defined as 0.0 when neither
/// appears, so the score always stays inside [-1.0, 1.0].
pub fn analyze(text: &str) -> (&'static str, f32) {
    let lower = text.to_lowercase();

    let positive = count_occurrences(&lower, POSITIVE);
    let negative = count_occurrences(&lower, NEGATIVE);
    let formal = count_occurrences(&lower, FORMAL);
    let casual = count_occurrences(&lower, CASUAL);

    let sentiment = if positive + negative > 0 {
        (positive as f32 - negative as f32) / (positive + negative) as f32
    } else {
        0.0
    };

    let tone = if formal > TONE_THRESHOLD {
        "formal"
    } else if casual > TONE_THRESHOLD {
        "casual"
    } else if negative > positive {
        "concerned"
    } else if positive > negative {
        "positive"
    } else {
        "neutral"
    };

    (tone, sentiment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_positive_is_full_score() {
        let (tone, sentiment) = analyze("Thank you, this is great work and I appreciate it.");
        assert_eq!(tone, "positive");
        assert_eq!(sentiment, 1.0);
    }

    #[test]
    fn test_all_negative_is_concerned() {
        let (tone, sentiment) = analyze("There is a problem and an error, the build will fail.");
        assert_eq!(tone, "concerned");
        assert_eq!(sentiment, -1.0);
    }

    #[test]
    fn test_no_sentiment_tokens_is_neutral_zero() {
        let (tone, sentiment) = analyze("The meeting starts at noon.");
        assert_eq!(tone, "neutral");
        assert_eq!(sentiment, 0.0);
    }

    #[test]
    fn test_formal_markers_win_over_sentiment() {
        let (tone, _) = analyze(
            "Dear Dr. Smith, kindly find the attached report. Thank you. Regards, Sincerely, Bob",
        );
        assert_eq!(tone, "formal");
    }

    #[test]
    fn test_casual_markers() {
        let (tone, _) = analyze("hey! btw that was cool, yeah we should do it again");
        assert_eq!(tone, "casual");
    }

    #[test]
    fn test_sentiment_always_in_range() {
        for text in [
            "thank thank thank problem",
            "problem problem thank",
            "",
            "great fail great fail",
        ] {
            let (_, sentiment) = analyze(text);
            assert!((-1.0..=1.0).contains(&sentiment));
        }
    }
}
