use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Deserialize;

use crate::models::job::{JobRecord, JobSource};
use crate::scraper::extract::{clean_title, parse_snippet_fields};
use crate::utils::config::SearchConfig;
use crate::utils::http::{Transport, TransportError};

/// Maximum results the search API returns per page.
const PAGE_SIZE: usize = 10;
const REGION: &str = "lb";
const LANGUAGE: &str = "lang_en";
pub const DEFAULT_LOCATION: &str = "Lebanon";

/// A job surface reachable through a `site:` restricted web search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobSite {
    LinkedIn,
    Bayt,
    Custom(String),
}

impl JobSite {
    pub fn domain(&self) -> &str {
        match self {
            JobSite::LinkedIn => "linkedin.com/jobs",
            JobSite::Bayt => "bayt.com",
            JobSite::Custom(domain) => domain,
        }
    }

    pub fn source(&self) -> JobSource {
        match self {
            JobSite::LinkedIn => JobSource::LinkedIn,
            JobSite::Bayt => JobSource::Bayt,
            JobSite::Custom(domain) => JobSource::Custom(domain.clone()),
        }
    }

    fn query(&self, title: &str, location: &str) -> String {
        match self {
            JobSite::LinkedIn => format!("{} {} jobs site:linkedin.com/jobs", title, location),
            JobSite::Bayt => format!("{} Lebanon site:bayt.com", title),
            JobSite::Custom(domain) => format!("{} {} site:{}", title, location, domain),
        }
    }

    /// Bayt only lists regional jobs, so everything is kept and pinned to
    /// Lebanon. Every other site must name Lebanon or Beirut in its title.
    fn accept(&self, mut job: JobRecord) -> Option<JobRecord> {
        match self {
            JobSite::Bayt => {
                job.location = DEFAULT_LOCATION.to_string();
                Some(job)
            }
            _ => is_lebanese_location(&job.location).then_some(job),
        }
    }
}

impl From<&str> for JobSite {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "linkedin" | "linkedin.com" | "linkedin.com/jobs" => JobSite::LinkedIn,
            "bayt" | "bayt.com" => JobSite::Bayt,
            _ => JobSite::Custom(s.to_string()),
        }
    }
}

pub fn is_lebanese_location(location: &str) -> bool {
    let location = location.to_lowercase();
    location == "lebanon" || location == "beirut" || location.ends_with(", lebanon")
}

/// Records gathered by a search, plus how many pages were abandoned because
/// the request failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOutcome {
    pub jobs: Vec<JobRecord>,
    pub skipped_pages: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    items: Option<Vec<SearchItem>>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    title: Option<String>,
    snippet: Option<String>,
    link: Option<String>,
}

pub struct JobSearchClient {
    transport: Arc<dyn Transport>,
    config: SearchConfig,
}

impl JobSearchClient {
    pub fn new(transport: Arc<dyn Transport>, config: SearchConfig) -> Self {
        JobSearchClient { transport, config }
    }

    pub async fn search_linkedin_jobs(&self, titles: &[String], num_results: usize) -> SearchOutcome {
        self.search_jobs(&JobSite::LinkedIn, titles, num_results, DEFAULT_LOCATION)
            .await
    }

    pub async fn search_bayt_jobs(&self, titles: &[String], num_results: usize) -> SearchOutcome {
        self.search_jobs(&JobSite::Bayt, titles, num_results, DEFAULT_LOCATION)
            .await
    }

    /// Pages through results for each title until `desired_count` records pass
    /// the site's acceptance filter. A failed page ends that title's search and
    /// is counted in [`SearchOutcome::skipped_pages`]; it never fails the call.
    pub async fn search_jobs(
        &self,
        site: &JobSite,
        titles: &[String],
        desired_count: usize,
        location: &str,
    ) -> SearchOutcome {
        let mut outcome = SearchOutcome::default();
        let pages_needed = desired_count.div_ceil(PAGE_SIZE);

        for title in titles {
            if outcome.jobs.len() >= desired_count {
                break;
            }

            let query = site.query(title, location);

            for page in 0..pages_needed {
                let remaining = desired_count - outcome.jobs.len();
                let items = match self.fetch_page(&query, page, remaining.min(PAGE_SIZE)).await {
                    Ok(items) => items,
                    Err(e) => {
                        warn!("error searching {} for {}: {}", site.domain(), title, e);
                        outcome.skipped_pages += 1;
                        break;
                    }
                };

                if items.is_empty() {
                    info!("no results found for {}", query);
                    break;
                }

                let now = Utc::now();
                for item in items {
                    if let Some(job) = site.accept(to_record(site, item, now)) {
                        outcome.jobs.push(job);
                    }
                    if outcome.jobs.len() >= desired_count {
                        break;
                    }
                }

                if outcome.jobs.len() >= desired_count {
                    break;
                }
            }
        }

        info!(
            "found {} results for {} ({} pages skipped)",
            outcome.jobs.len(),
            site.domain(),
            outcome.skipped_pages
        );
        outcome
    }

    async fn fetch_page(
        &self,
        query: &str,
        page: usize,
        num: usize,
    ) -> Result<Vec<SearchItem>, TransportError> {
        let mut params: Vec<(&str, String)> = Vec::with_capacity(8);
        if let Some(key) = &self.config.api_key {
            params.push(("key", key.clone()));
        }
        if let Some(cx) = &self.config.engine_id {
            params.push(("cx", cx.clone()));
        }
        params.push(("q", query.to_string()));
        params.push(("num", num.to_string()));
        params.push(("start", (page * PAGE_SIZE + 1).to_string()));
        params.push(("gl", REGION.to_string()));
        params.push(("lr", LANGUAGE.to_string()));
        params.push(("safe", "off".to_string()));

        debug!("searching page {} for '{}' (num: {})", page + 1, query, num);

        let body = self.transport.get_json(&self.config.endpoint, &params).await?;
        let response: SearchResponse =
            serde_json::from_value(body).map_err(|e| TransportError::Decode(e.to_string()))?;

        Ok(response.items.unwrap_or_default())
    }
}

fn to_record(site: &JobSite, item: SearchItem, now: DateTime<Utc>) -> JobRecord {
    let raw_title = item.title.unwrap_or_default();
    let snippet = item.snippet.unwrap_or_default();
    let fields = parse_snippet_fields(&snippet, &raw_title, now);

    JobRecord {
        title: clean_title(&raw_title),
        link: item.link.unwrap_or_default(),
        description: snippet,
        location: fields.location,
        employment_type: fields.employment_type,
        posted_at: fields.posted_at,
        source: site.source(),
    }
}
