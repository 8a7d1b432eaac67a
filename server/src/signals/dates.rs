use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Relative terms resolve against the analysis instant with fixed offsets.
const RELATIVE_OFFSETS: &[(&str, i64)] = &[
    ("today", 0),
    ("tomorrow", 1),
    ("next week", 7),
    ("next month", 30),
];

static RE_ISO: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").unwrap());
static RE_NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})[/-](\d{1,2})[/-](\d{2,4})\b").unwrap());
static RE_MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+(\d{1,2})(?:st|nd|rd|th)?(?:,?\s+(\d{4}))?\b",
    )
    .unwrap()
});

const MONTHS: &[&str] = &[
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Find a deadline in free text. Relative terms win over absolute dates;
/// absolute candidates go through the fuzzy format list. `None` when
/// nothing date-like appears.
pub fn extract_deadline(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let lower = text.to_lowercase();

    for (term, days) in RELATIVE_OFFSETS {
        if lower.contains(term) {
            return Some(now + Duration::days(*days));
        }
    }

    parse_absolute(&lower, now)
}

fn parse_absolute(lower: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if let Some(caps) = RE_ISO.captures(lower) {
        let ymd = (
            caps[1].parse::<i32>().ok(),
            caps[2].parse::<u32>().ok(),
            caps[3].parse::<u32>().ok(),
        );
        if let (Some(y), Some(m), Some(d)) = ymd {
            if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
                return midnight(date);
            }
        }
    }

    if let Some(caps) = RE_NUMERIC.captures(lower) {
        let parts = (
            caps[1].parse::<u32>().ok(),
            caps[2].parse::<u32>().ok(),
            caps[3].parse::<i32>().ok(),
        );
        if let (Some(a), Some(b), Some(year)) = parts {
            let year = if year < 100 { year + 2000 } else { year };
            // month/day first, day/month as the fallback reading
            let date = NaiveDate::from_ymd_opt(year, a, b)
                .or_else(|| NaiveDate::from_ymd_opt(year, b, a));
            if let Some(date) = date {
                return midnight(date);
            }
        }
    }

    if let Some(caps) = RE_MONTH.captures(lower) {
        let month = MONTHS.iter().position(|m| *m == &caps[1])? as u32 + 1;
        let day = caps[2].parse::<u32>().ok()?;
        let year = caps
            .get(3)
            .and_then(|y| y.as_str().parse::<i32>().ok())
            .unwrap_or_else(|| now.year());
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return midnight(date);
        }
    }

    None
}

fn midnight(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(0, 0, 0)
        .map(|ndt| Utc.from_utc_datetime(&ndt))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 7, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_relative_terms_use_fixed_offsets() {
        let now = instant();
        assert_eq!(
            extract_deadline("please reply today", now),
            Some(now)
        );
        assert_eq!(
            extract_deadline("send it by tomorrow", now),
            Some(now + Duration::days(1))
        );
        assert_eq!(
            extract_deadline("we can discuss next week", now),
            Some(now + Duration::days(7))
        );
        assert_eq!(
            extract_deadline("the review is next month", now),
            Some(now + Duration::days(30))
        );
    }

    #[test]
    fn test_iso_date() {
        let deadline = extract_deadline("due on 2025-09-01", instant()).unwrap();
        assert_eq!(deadline, Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_numeric_date() {
        let deadline = extract_deadline("deadline is 9/15/2025", instant()).unwrap();
        assert_eq!(deadline, Utc.with_ymd_and_hms(2025, 9, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_day_month_fallback() {
        // 25 cannot be a month, so the day/month reading applies
        let deadline = extract_deadline("deadline is 25/09/2025", instant()).unwrap();
        assert_eq!(deadline, Utc.with_ymd_and_hms(2025, 9, 25, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_month_name_defaults_to_current_year() {
        let deadline = extract_deadline("the offsite is on September 12th", instant()).unwrap();
        assert_eq!(deadline, Utc.with_ymd_and_hms(2025, 9, 12, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_no_date_is_none() {
        assert_eq!(extract_deadline("no dates in here", instant()), None);
    }
}
