use log::{debug, info, warn};
use serde_json::Value;

use crate::chat::gemini::{AiError, GeminiClient};
use crate::models::advice::{ADVICE_COUNT, AdviceResult};

/// Emojis that mark a line of model output as an advice bullet.
const ADVICE_EMOJIS: [&str; 15] = [
    "🎯", "💡", "📚", "🚀", "📝", "💼", "🌟", "📈", "🎨", "🔍", "🧭", "🗨", "🎮", "🌍", "📱",
];

const DEFAULT_BULLET_EMOJI: &str = "💡";

/// Fills slot `i` when the model produced fewer than `i + 1` bullets.
const DEFAULT_ADVICE: [&str; ADVICE_COUNT] = [
    "🎯 Set clear career goals and milestones",
    "💡 Focus on building relevant technical skills",
    "📚 Consider additional certifications or training",
    "🚀 Look for growth opportunities in your current role",
    "💼 Network and build professional connections",
    "🎮 Build a portfolio of personal projects",
    "🌍 Stay updated with industry trends and technologies",
    "📱 Develop both technical and soft skills",
];

const TITLE_KEYWORDS: [&str; 5] = ["engineer", "developer", "analyst", "manager", "designer"];

const NUMBERED_PREFIXES: [&str; 8] = ["1.", "2.", "3.", "4.", "5.", "6.", "7.", "8."];

const BULLET_MARKERS: [char; 4] = ['-', '*', '•', ' '];

pub struct CareerAdvisor {
    gemini: GeminiClient,
}

impl CareerAdvisor {
    pub fn new(gemini: GeminiClient) -> Self {
        CareerAdvisor { gemini }
    }

    pub async fn analyze_cv(&self, cv_text: &str) -> Result<AdviceResult, AiError> {
        info!("analyzing CV with Gemini");
        debug!("CV length: {} characters", cv_text.len());

        let prompt = format!(
            "You are a career advisor. From this CV, do the following:\n\
            1. Suggest 3-5 realistic job titles for the user (as a JSON list).\n\
            2. Give exactly 8 main career advice points. Each point should start with a relevant emoji \
            (like 🎯 for goals, 💡 for insights, 📚 for learning, 🚀 for growth, or 💼 for career). \
            Format each point as a single line starting with the emoji followed by the advice.\n\n\
            {}",
            cv_text
        );

        let timeout = self.gemini.default_timeout();
        let text = self.gemini.generate(&prompt, Some(timeout)).await?;

        let advice = parse_advice(&text);
        info!(
            "extracted {} job titles and {} advice points",
            advice.job_titles.len(),
            advice.advice_bullets.len()
        );

        Ok(advice)
    }
}

pub fn parse_advice(text: &str) -> AdviceResult {
    AdviceResult {
        job_titles: parse_job_titles(text),
        advice_bullets: normalize_bullets(parse_advice_bullets(text)),
    }
}

/// JSON array first, keyword-bearing lines second.
fn parse_job_titles(text: &str) -> Vec<String> {
    json_array_titles(text).unwrap_or_else(|| {
        warn!("no JSON title list in advice response, scanning for title-like lines");
        keyword_line_titles(text)
    })
}

fn json_array_titles(text: &str) -> Option<Vec<String>> {
    let start = text.find('[')?;
    let end = start + text[start..].find(']')?;

    let values: Vec<Value> = serde_json::from_str(&text[start..=end]).ok()?;

    Some(
        values
            .into_iter()
            .map(|value| match value {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
    )
}

fn keyword_line_titles(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| {
            let lowered = line.to_lowercase();
            TITLE_KEYWORDS.iter().any(|k| lowered.contains(k))
        })
        .map(|line| line.trim_matches(BULLET_MARKERS).to_string())
        .collect()
}

/// Emoji-led lines first, numbered `1.`..`8.` lines second.
fn parse_advice_bullets(text: &str) -> Vec<String> {
    let bullets = emoji_bullets(text);
    if !bullets.is_empty() {
        return bullets;
    }

    debug!("no emoji-led advice lines, falling back to numbered lines");
    numbered_bullets(text)
}

fn emoji_bullets(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| {
            let head: String = line.chars().take(2).collect();
            ADVICE_EMOJIS.iter().any(|emoji| head.contains(emoji))
        })
        .map(|line| line.trim_start_matches(BULLET_MARKERS).to_string())
        .collect()
}

fn numbered_bullets(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| NUMBERED_PREFIXES.iter().any(|p| line.starts_with(p)))
        .map(|line| {
            if ADVICE_EMOJIS.iter().any(|emoji| line.contains(emoji)) {
                line.to_string()
            } else {
                format!("{} {}", DEFAULT_BULLET_EMOJI, line)
            }
        })
        .collect()
}

/// Pads slot by slot from [`DEFAULT_ADVICE`], then truncates, so the result
/// always holds exactly [`ADVICE_COUNT`] bullets.
fn normalize_bullets(mut bullets: Vec<String>) -> Vec<String> {
    while bullets.len() < ADVICE_COUNT {
        bullets.push(DEFAULT_ADVICE[bullets.len()].to_string());
    }
    bullets.truncate(ADVICE_COUNT);
    bullets
}
