mod chat;
mod models;
mod scraper;
mod utils;

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use eyre::{Result, WrapErr, bail, eyre};
use log::{debug, info, warn};

use crate::chat::advisor::CareerAdvisor;
use crate::chat::gemini::{AiError, GeminiClient};
use crate::chat::ranker::JobRanker;
use crate::models::advice::AdviceResult;
use crate::models::job::{EmploymentType, JobRecord, JobSource};
use crate::scraper::search::{DEFAULT_LOCATION, JobSearchClient, JobSite};
use crate::utils::cli::{Args, Command};
use crate::utils::collate::{
    JobFilter, dedup_jobs, facet_values, filter_jobs, is_displayable, match_ranked_jobs,
    source_counts, tidy_description, unranked_jobs,
};
use crate::utils::config::{Config, config};
use crate::utils::http::{HttpTransport, Transport};
use crate::utils::log::Logger;

const MIN_JOBS_PER_SOURCE: usize = 3;
const MAX_JOBS_PER_SOURCE: usize = 15;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    Logger::init(args.verbosity);

    info!(
        "starting career-scout {}",
        format!("v{}", env!("CARGO_PKG_VERSION")).magenta()
    );

    let config: Config = config(args.config)?;
    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new());

    match args.command {
        Command::Advise { cv } => {
            let cv_text = read_cv(&cv).await?;
            let advisor = CareerAdvisor::new(GeminiClient::new(
                transport.clone(),
                config.gemini.clone(),
            ));
            let advice = advisor.analyze_cv(&cv_text).await.map_err(report)?;
            print_advice(&advice);
        }
        Command::Search {
            titles,
            count,
            source,
        } => {
            let client = JobSearchClient::new(transport.clone(), config.search.clone());
            let count = clamp_count(count);

            let mut jobs = Vec::new();
            for site in sites_for(&source) {
                let outcome = client
                    .search_jobs(&site, &titles, count, DEFAULT_LOCATION)
                    .await;
                if outcome.skipped_pages > 0 {
                    warn!(
                        "{} page(s) from {} failed, results may be incomplete",
                        outcome.skipped_pages,
                        site.domain()
                    );
                }
                jobs.extend(outcome.jobs);
            }

            let jobs = dedup_jobs(jobs);
            let refs: Vec<&JobRecord> = jobs.iter().collect();
            print_summary(&refs);
            print_jobs("Jobs", &refs, 150);
        }
        Command::Match {
            cv,
            title,
            count,
            top,
            locations,
            job_types,
            sources,
        } => {
            let cv_text = read_cv(&cv).await?;
            let gemini = || GeminiClient::new(transport.clone(), config.gemini.clone());

            let advice = CareerAdvisor::new(gemini())
                .analyze_cv(&cv_text)
                .await
                .map_err(report)?;
            print_advice(&advice);

            let selected_title = match title.or_else(|| advice.job_titles.first().cloned()) {
                Some(title) => title,
                None => bail!("no job title given and none could be suggested from the CV"),
            };
            info!("searching jobs for '{}'", selected_title);

            let client = JobSearchClient::new(transport.clone(), config.search.clone());
            let count = clamp_count(count);
            let query = [selected_title.clone()];

            let linkedin = client.search_linkedin_jobs(&query, count).await;
            let bayt = client.search_bayt_jobs(&query, count).await;
            let skipped = linkedin.skipped_pages + bayt.skipped_pages;
            if skipped > 0 {
                warn!("{} search page(s) failed, results may be incomplete", skipped);
            }

            let jobs = dedup_jobs(linkedin.jobs.into_iter().chain(bayt.jobs).collect());

            let facets = facet_values(&jobs);
            debug!(
                "available filters: locations {:?}, types {:?}, sources {:?}",
                facets.locations, facets.types, facets.sources
            );

            let filter = build_filter(locations, job_types, sources);
            let filtered = filter_jobs(&jobs, &filter);
            print_summary(&filtered);

            if filtered.is_empty() {
                warn!("no jobs left to rank, try another title or fewer filters");
                return Ok(());
            }

            let candidates: Vec<JobRecord> = filtered.iter().map(|job| (*job).clone()).collect();
            let ranking = JobRanker::new(gemini())
                .rank_jobs(&cv_text, &selected_title, &candidates, top)
                .await;

            match ranking {
                Err(e) => {
                    debug!("ranking error details: {:?}", e.details);
                    println!(
                        "\n{}",
                        "AI job matching failed. Please try again later or check your API key."
                            .red()
                    );
                    println!("{}", e.message.dimmed());
                    print_jobs("All Matching Jobs", &filtered, 150);
                }
                Ok(result) if result.ai_job_matches.trim().is_empty() => {
                    warn!("no AI job recommendations were returned");
                    print_jobs("All Matching Jobs", &filtered, 150);
                }
                Ok(result) => {
                    let text = &result.ai_job_matches;
                    let recommended: Vec<&JobRecord> =
                        match_ranked_jobs(text, &filtered).into_iter().take(top).collect();

                    print_jobs("AI-Recommended Jobs", &recommended, 180);
                    println!("\n{}", "=== Why These Jobs ===".cyan().bold());
                    println!("{}", text);
                    print_jobs("All Matching Jobs", &unranked_jobs(text, &filtered), 150);
                }
            }
        }
    }

    Ok(())
}

async fn read_cv(path: &Path) -> Result<String> {
    info!("reading CV from file: {}", path.display());

    let text = tokio::fs::read_to_string(path)
        .await
        .wrap_err_with(|| format!("failed to read CV from {}", path.display()))?;

    if text.trim().is_empty() {
        bail!("CV file {} is empty", path.display());
    }

    Ok(text)
}

fn report(err: AiError) -> eyre::Report {
    if let Some(details) = &err.details {
        debug!("AI error details: {}", details);
    }
    eyre!("{} [{}]", err.message, err.kind)
}

fn clamp_count(count: usize) -> usize {
    let clamped = count.clamp(MIN_JOBS_PER_SOURCE, MAX_JOBS_PER_SOURCE);
    if clamped != count {
        warn!(
            "jobs per source must be between {} and {}, using {}",
            MIN_JOBS_PER_SOURCE, MAX_JOBS_PER_SOURCE, clamped
        );
    }
    clamped
}

fn sites_for(source: &str) -> Vec<JobSite> {
    match source.to_lowercase().as_str() {
        "all" => vec![JobSite::LinkedIn, JobSite::Bayt],
        _ => vec![JobSite::from(source)],
    }
}

fn build_filter(
    locations: Vec<String>,
    job_types: Vec<String>,
    sources: Vec<String>,
) -> JobFilter {
    fn non_empty<T>(values: Vec<T>) -> Option<Vec<T>> {
        (!values.is_empty()).then_some(values)
    }

    JobFilter {
        locations: non_empty(locations),
        types: non_empty(
            job_types
                .iter()
                .map(|t| EmploymentType::from(t.as_str()))
                .collect(),
        ),
        sources: non_empty(
            sources
                .iter()
                .map(|s| JobSource::from(s.as_str()))
                .collect(),
        ),
    }
}

fn print_advice(advice: &AdviceResult) {
    println!("\n{}", "=== Suggested Job Titles ===".cyan().bold());
    println!("{}", advice.titles_markdown());

    println!("\n{}", "=== AI Career Advice ===".cyan().bold());
    println!("{}", advice.advice_markdown());
}

fn print_summary(jobs: &[&JobRecord]) {
    println!(
        "\n{}",
        format!("Found {} matching jobs", jobs.len()).bright_blue().bold()
    );
    for (source, count) in source_counts(jobs.iter().copied()) {
        println!("  {}: {} jobs", source, count.to_string().bold());
    }
}

fn print_jobs(header: &str, jobs: &[&JobRecord], description_chars: usize) {
    let jobs: Vec<&JobRecord> = jobs.iter().copied().filter(|job| is_displayable(job)).collect();
    if jobs.is_empty() {
        return;
    }

    println!("\n{}", format!("=== {} ===", header).cyan().bold());
    for job in jobs {
        println!("{} {}", job.title.bold(), job.link.dimmed());
        println!(
            "   {} | {} | {} | posted {}",
            job.location,
            job.employment_type,
            job.source.to_string().yellow(),
            job.posted_at.format("%Y-%m-%d")
        );
        println!(
            "   {}\n",
            tidy_description(&job.description, description_chars)
        );
    }
}
