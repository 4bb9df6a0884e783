use log::{debug, info};

use crate::chat::gemini::{AiError, ErrorKind, GeminiClient};
use crate::models::advice::RankingResult;
use crate::models::job::JobRecord;

pub const DEFAULT_TOP_N: usize = 3;

const TITLE_LIMIT: usize = 60;
const DESCRIPTION_LIMIT: usize = 200;

pub struct JobRanker {
    gemini: GeminiClient,
}

impl JobRanker {
    pub fn new(gemini: GeminiClient) -> Self {
        JobRanker { gemini }
    }

    /// Asks the model to pick and explain the best `top_n` jobs. The reply is
    /// returned verbatim; picks are marked with `Title: <job title>` lines.
    pub async fn rank_jobs(
        &self,
        cv_text: &str,
        selected_title: &str,
        jobs: &[JobRecord],
        top_n: usize,
    ) -> Result<RankingResult, AiError> {
        info!("ranking {} jobs for '{}'", jobs.len(), selected_title);

        let job_list = job_listing(jobs);
        debug!("job listing length: {} characters", job_list.len());

        let prompt = format!(
            "Here is a user's CV:\n{}\n\n\
            The user is interested in: {}\n\n\
            Here are some job postings:\n{}\n\n\
            Please select the top {} jobs that best match the user's profile and interest. \
            For each, explain why it is a good fit. Organize the results clearly as markdown.",
            cv_text, selected_title, job_list, top_n
        );

        let text = self.gemini.generate(&prompt, None).await.map_err(|e| match e.kind {
            ErrorKind::Config => e,
            _ => e.context("AI job matching failed"),
        })?;

        Ok(RankingResult {
            ai_job_matches: text,
        })
    }
}

fn job_listing(jobs: &[JobRecord]) -> String {
    jobs.iter()
        .enumerate()
        .map(|(i, job)| {
            format!(
                "{}. Title: {}\n   Description: {}\n   Location: {}\n   Type: {}\n   Source: {}\n",
                i + 1,
                truncate_chars(&job.title, TITLE_LIMIT),
                truncate_chars(&job.description, DESCRIPTION_LIMIT),
                job.location,
                job.employment_type,
                job.source
            )
        })
        .collect()
}

fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
