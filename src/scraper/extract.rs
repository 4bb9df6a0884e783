use std::sync::LazyLock;

use chrono::{DateTime, TimeDelta, Utc};
use regex::Regex;

use crate::models::job::EmploymentType;

static RELATIVE_AGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([0-9]+)\s+(day|week|month|year)s? ago").expect("valid relative age regex")
});

static LEADING_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[+,]?\s*").expect("valid leading count regex"));

static NEW_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(\d+\s*new\)$").expect("valid new-count regex"));

static JOBS_IN_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*Jobs?\s*in\s*.*$").expect("valid jobs-in regex"));

static LOCATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"in\s+([^,]+(?:,\s*[^,]+)*)").expect("valid location regex"));

// Tried in order against the lowercased snippet.
static DATE_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        r"([0-9]+)\s+(day|week|month|year)s?\s+ago",
        r"posted\s+([0-9]+)\s+(day|week|month|year)s?\s+ago",
        r"([0-9]+)\s+(day|week|month|year)s?\s+old",
    ]
    .map(|p| Regex::new(p).expect("valid date regex"))
});

// Checked in order; the first keyword found wins.
const TYPE_KEYWORDS: [(&str, EmploymentType); 5] = [
    ("full", EmploymentType::FullTime),
    ("part", EmploymentType::PartTime),
    ("intern", EmploymentType::Internship),
    ("contract", EmploymentType::Contract),
    ("temporary", EmploymentType::Temporary),
];

const UNKNOWN_LOCATION: &str = "Unknown";

#[derive(Debug, Clone, PartialEq)]
pub struct SnippetFields {
    pub location: String,
    pub employment_type: EmploymentType,
    pub posted_at: DateTime<Utc>,
}

/// Converts `"<n> <day|week|month|year>(s) ago"` into an absolute time.
///
/// Units are fixed day counts (a month is always 30 days, a year 365). Anything
/// that does not match, or that would overflow, yields `now`.
pub fn parse_relative_age(text: &str, now: DateTime<Utc>) -> DateTime<Utc> {
    let Some(caps) = RELATIVE_AGE.captures(text) else {
        return now;
    };
    let Ok(count) = caps[1].parse::<i64>() else {
        return now;
    };

    let days_per_unit = match caps[2].to_lowercase().as_str() {
        "day" => 1,
        "week" => 7,
        "month" => 30,
        _ => 365,
    };

    count
        .checked_mul(days_per_unit)
        .and_then(TimeDelta::try_days)
        .and_then(|delta| now.checked_sub_signed(delta))
        .unwrap_or(now)
}

/// Strips result-count prefixes, `(N new)` suffixes and `Jobs in <place>`
/// tails from a search-result title.
pub fn clean_title(raw: &str) -> String {
    let title = LEADING_COUNT.replace(raw, "");
    let title = NEW_SUFFIX.replace(&title, "");
    let title = JOBS_IN_SUFFIX.replace(&title, "");
    title.trim().to_string()
}

pub fn parse_snippet_fields(snippet: &str, title: &str, now: DateTime<Utc>) -> SnippetFields {
    SnippetFields {
        location: extract_location(title),
        employment_type: infer_employment_type(snippet),
        posted_at: extract_posted_at(snippet, now),
    }
}

fn extract_location(title: &str) -> String {
    let location = LOCATION
        .captures(title)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(UNKNOWN_LOCATION);

    NEW_SUFFIX.replace(location, "").trim().to_string()
}

fn infer_employment_type(snippet: &str) -> EmploymentType {
    let lowered = snippet.to_lowercase();
    TYPE_KEYWORDS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, kind)| *kind)
        .unwrap_or(EmploymentType::Unknown)
}

fn extract_posted_at(snippet: &str, now: DateTime<Utc>) -> DateTime<Utc> {
    let lowered = snippet.to_lowercase();
    DATE_PATTERNS
        .iter()
        .find_map(|pattern| pattern.find(&lowered))
        .map(|m| parse_relative_age(m.as_str(), now))
        .unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn days_before(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
        now - TimeDelta::days(days)
    }

    #[test]
    fn test_parse_relative_age_units() {
        let now = fixed_now();
        assert_eq!(parse_relative_age("3 days ago", now), days_before(now, 3));
        assert_eq!(parse_relative_age("2 weeks ago", now), days_before(now, 14));
        assert_eq!(parse_relative_age("1 month ago", now), days_before(now, 30));
        assert_eq!(parse_relative_age("4 years ago", now), days_before(now, 1460));
    }

    #[test]
    fn test_parse_relative_age_is_case_insensitive() {
        let now = fixed_now();
        assert_eq!(parse_relative_age("5 Days Ago", now), days_before(now, 5));
    }

    #[test]
    fn test_parse_relative_age_unmatched_is_now() {
        let now = fixed_now();
        assert_eq!(parse_relative_age("recently", now), now);
        assert_eq!(parse_relative_age("posted 3 days ago", now), now);
        assert_eq!(parse_relative_age("3 days old", now), now);
    }

    #[test]
    fn test_counts_are_ascii_digits_only() {
        let now = fixed_now();
        assert_eq!(parse_relative_age("٣ days ago", now), now);

        let fields = parse_snippet_fields("٣ days ago. Reposted 2 weeks ago", "Analyst", now);
        assert_eq!(fields.posted_at, days_before(now, 14));
    }

    #[test]
    fn test_parse_relative_age_overflow_is_now() {
        let now = fixed_now();
        assert_eq!(parse_relative_age("99999999999999999999 days ago", now), now);
        assert_eq!(parse_relative_age("9999999999999 years ago", now), now);
    }

    #[test]
    fn test_parse_relative_age_with_wall_clock() {
        let before = Utc::now();
        let parsed = parse_relative_age("recently", Utc::now());
        assert!((parsed - before).num_seconds().abs() < 5);
    }

    #[test]
    fn test_clean_title_strips_all_decorations() {
        assert_eq!(
            clean_title("120+ Software Engineer Jobs in Beirut (42 new)"),
            "Software Engineer"
        );
    }

    #[test]
    fn test_clean_title_each_rule_alone() {
        assert_eq!(clean_title("45, Data Analyst"), "Data Analyst");
        assert_eq!(clean_title("Data Analyst (7 new)"), "Data Analyst");
        assert_eq!(clean_title("Accountant Job in Lebanon"), "Accountant");
    }

    #[test]
    fn test_clean_title_is_idempotent_on_clean_input() {
        let once = clean_title("Backend Developer");
        assert_eq!(once, "Backend Developer");
        assert_eq!(clean_title(&once), once);
    }

    #[test]
    fn test_location_from_title() {
        let fields = parse_snippet_fields("", "Jobs in Beirut, Lebanon (10 new)", fixed_now());
        assert_eq!(fields.location, "Beirut, Lebanon");
    }

    #[test]
    fn test_location_defaults_to_unknown() {
        let fields = parse_snippet_fields("", "Senior Accountant - Acme", fixed_now());
        assert_eq!(fields.location, "Unknown");
    }

    #[test]
    fn test_employment_type_first_keyword_wins() {
        let now = fixed_now();
        assert_eq!(
            parse_snippet_fields("Full-time position", "", now).employment_type,
            EmploymentType::FullTime
        );
        assert_eq!(
            parse_snippet_fields("Paid intern role on a contract basis", "", now).employment_type,
            EmploymentType::Internship
        );
        assert_eq!(
            parse_snippet_fields("TEMPORARY cover", "", now).employment_type,
            EmploymentType::Temporary
        );
        assert_eq!(
            parse_snippet_fields("Great team", "", now).employment_type,
            EmploymentType::Unknown
        );
    }

    #[test]
    fn test_posted_at_from_snippet() {
        let now = fixed_now();
        let fields = parse_snippet_fields("Beirut · 2 Weeks ago · 30 applicants", "", now);
        assert_eq!(fields.posted_at, days_before(now, 14));
    }

    #[test]
    fn test_posted_at_old_phrasing_falls_back_to_now() {
        let now = fixed_now();
        let fields = parse_snippet_fields("listing is 5 days old", "", now);
        assert_eq!(fields.posted_at, now);
    }

    #[test]
    fn test_posted_at_missing_is_now() {
        let now = fixed_now();
        assert_eq!(parse_snippet_fields("apply today", "", now).posted_at, now);
    }
}
