use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::models::job::{EmploymentType, JobRecord, JobSource};

static RANKED_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Title: (.+)").expect("valid ranked title regex"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

static DOT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.{2,}").expect("valid ellipsis regex"));

/// Keeps the first record per `(lowercased title, link)`; records missing
/// either are dropped.
pub fn dedup_jobs(jobs: Vec<JobRecord>) -> Vec<JobRecord> {
    let mut seen = HashSet::new();
    jobs.into_iter()
        .filter(|job| !job.title.is_empty() && !job.link.is_empty())
        .filter(|job| seen.insert(job.dedup_key()))
        .collect()
}

/// Allow-lists per facet; `None` lets every value through.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub locations: Option<Vec<String>>,
    pub types: Option<Vec<EmploymentType>>,
    pub sources: Option<Vec<JobSource>>,
}

impl JobFilter {
    pub fn matches(&self, job: &JobRecord) -> bool {
        fn allows<T: PartialEq>(allowed: &Option<Vec<T>>, value: &T) -> bool {
            allowed.as_ref().is_none_or(|values| values.contains(value))
        }

        allows(&self.locations, &job.location)
            && allows(&self.types, &job.employment_type)
            && allows(&self.sources, &job.source)
    }
}

pub fn filter_jobs<'a>(jobs: &'a [JobRecord], filter: &JobFilter) -> Vec<&'a JobRecord> {
    jobs.iter().filter(|job| filter.matches(job)).collect()
}

/// Distinct facet values, sorted, for building filter choices.
#[derive(Debug, Default, PartialEq)]
pub struct Facets {
    pub locations: BTreeSet<String>,
    pub types: BTreeSet<EmploymentType>,
    pub sources: BTreeSet<JobSource>,
}

pub fn facet_values(jobs: &[JobRecord]) -> Facets {
    let mut facets = Facets::default();
    for job in jobs {
        facets.locations.insert(job.location.clone());
        facets.types.insert(job.employment_type);
        facets.sources.insert(job.source.clone());
    }
    facets
}

/// Per-source totals in first-seen order.
pub fn source_counts<'a, I>(jobs: I) -> Vec<(JobSource, usize)>
where
    I: IntoIterator<Item = &'a JobRecord>,
{
    let mut counts: Vec<(JobSource, usize)> = Vec::new();
    for job in jobs {
        match counts.iter_mut().find(|(source, _)| *source == job.source) {
            Some((_, count)) => *count += 1,
            None => counts.push((job.source.clone(), 1)),
        }
    }
    counts
}

/// Every `Title: <text>` marker in ranking text, trimmed, in order.
pub fn extract_ranked_titles(text: &str) -> Vec<String> {
    RANKED_TITLE
        .captures_iter(text)
        .map(|caps| caps[1].trim().to_string())
        .collect()
}

/// Jobs named by the ranking text, in the order the model listed them. Only
/// exact (case-sensitive) title matches count, and each job appears once.
pub fn match_ranked_jobs<'a>(text: &str, jobs: &[&'a JobRecord]) -> Vec<&'a JobRecord> {
    let mut picked: Vec<&'a JobRecord> = Vec::new();
    for title in extract_ranked_titles(text) {
        let candidate = jobs
            .iter()
            .copied()
            .find(|job| job.title == title && !picked.iter().any(|p| std::ptr::eq(*p, *job)));
        if let Some(job) = candidate {
            picked.push(job);
        }
    }
    picked
}

/// Jobs whose title was not named anywhere in the ranking text.
pub fn unranked_jobs<'a>(text: &str, jobs: &[&'a JobRecord]) -> Vec<&'a JobRecord> {
    let titles = extract_ranked_titles(text);
    jobs.iter()
        .copied()
        .filter(|job| !titles.contains(&job.title))
        .collect()
}

/// Worth a card: has a title and description, and the title is not just "jobs".
pub fn is_displayable(job: &JobRecord) -> bool {
    !job.title.is_empty()
        && !job.description.is_empty()
        && job.title.trim().to_lowercase() != "jobs"
}

/// Collapses whitespace and dot runs, then cuts to `max_chars` with an ellipsis.
pub fn tidy_description(description: &str, max_chars: usize) -> String {
    let text = WHITESPACE_RUN.replace_all(description, " ");
    let text = DOT_RUN.replace_all(&text, "...");

    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn job(title: &str, link: &str, source: JobSource) -> JobRecord {
        JobRecord {
            title: title.to_string(),
            link: link.to_string(),
            description: format!("About {}", title),
            location: "Lebanon".to_string(),
            employment_type: EmploymentType::Unknown,
            posted_at: Utc::now(),
            source,
        }
    }

    #[test]
    fn test_dedup_by_lowercased_title_and_link() {
        let jobs = vec![
            job("Data Analyst", "https://a", JobSource::LinkedIn),
            job("data analyst", "https://a", JobSource::Bayt),
            job("Data Analyst", "https://b", JobSource::Bayt),
            job("", "https://c", JobSource::Bayt),
            job("Engineer", "", JobSource::Bayt),
        ];

        let deduped = dedup_jobs(jobs);

        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].source, JobSource::LinkedIn);
        assert_eq!(deduped[1].link, "https://b");
    }

    #[test]
    fn test_filter_none_allows_all() {
        let jobs = vec![
            job("A", "https://a", JobSource::LinkedIn),
            job("B", "https://b", JobSource::Bayt),
        ];
        assert_eq!(filter_jobs(&jobs, &JobFilter::default()).len(), 2);
    }

    #[test]
    fn test_filter_by_source_and_location() {
        let mut beirut = job("A", "https://a", JobSource::LinkedIn);
        beirut.location = "Beirut".to_string();
        let jobs = vec![beirut, job("B", "https://b", JobSource::Bayt)];

        let filter = JobFilter {
            sources: Some(vec![JobSource::LinkedIn]),
            ..Default::default()
        };
        let filtered = filter_jobs(&jobs, &filter);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "A");

        let filter = JobFilter {
            locations: Some(vec!["Lebanon".to_string()]),
            types: Some(vec![EmploymentType::Unknown]),
            ..Default::default()
        };
        let filtered = filter_jobs(&jobs, &filter);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "B");
    }

    #[test]
    fn test_facets_and_source_counts() {
        let jobs = vec![
            job("A", "https://a", JobSource::Bayt),
            job("B", "https://b", JobSource::LinkedIn),
            job("C", "https://c", JobSource::Bayt),
        ];

        let facets = facet_values(&jobs);
        assert_eq!(facets.locations.len(), 1);
        assert_eq!(facets.sources.len(), 2);

        assert_eq!(
            source_counts(&jobs),
            vec![(JobSource::Bayt, 2), (JobSource::LinkedIn, 1)]
        );
    }

    #[test]
    fn test_ranked_titles_reassociate_exact_matches_only() {
        let jobs = vec![
            job("Data Analyst", "https://a", JobSource::LinkedIn),
            job("BI Developer", "https://b", JobSource::Bayt),
            job("Data Analyst", "https://c", JobSource::Bayt),
        ];
        let refs: Vec<&JobRecord> = jobs.iter().collect();
        let text = "1. **Title: BI Developer**\n\
            Title: data analyst\n\
            Title: Data Analyst  \n\
            Title: Data Analyst\n\
            Title: Astronaut\n";

        assert_eq!(
            extract_ranked_titles(text),
            vec![
                "BI Developer**",
                "data analyst",
                "Data Analyst",
                "Data Analyst",
                "Astronaut"
            ]
        );

        let picked = match_ranked_jobs(text, &refs);
        let links: Vec<&str> = picked.iter().map(|j| j.link.as_str()).collect();
        assert_eq!(links, vec!["https://a", "https://c"]);

        let rest = unranked_jobs(text, &refs);
        let rest_titles: Vec<&str> = rest.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(rest_titles, vec!["BI Developer"]);
    }

    #[test]
    fn test_round_trip_through_ranking_markers() {
        let jobs = vec![
            job("Backend Developer", "https://a", JobSource::LinkedIn),
            job("QA Engineer", "https://b", JobSource::Bayt),
        ];
        let refs: Vec<&JobRecord> = jobs.iter().collect();
        let text = "Title: QA Engineer\nTitle: Backend Developer\nTitle: Made Up Role\n";

        let picked = match_ranked_jobs(text, &refs);

        let titles: Vec<&str> = picked.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["QA Engineer", "Backend Developer"]);
    }

    #[test]
    fn test_tidy_description() {
        assert_eq!(tidy_description("Join  our\n team.....", 100), "Join our team...");
        assert_eq!(tidy_description("abcdef", 3), "abc...");
    }

    #[test]
    fn test_is_displayable() {
        assert!(is_displayable(&job("Analyst", "https://a", JobSource::Bayt)));
        assert!(!is_displayable(&job(" Jobs ", "https://a", JobSource::Bayt)));

        let mut blank = job("Analyst", "https://a", JobSource::Bayt);
        blank.description.clear();
        assert!(!is_displayable(&blank));
    }
}
