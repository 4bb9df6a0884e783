use serde::{Deserialize, Serialize};

/// Number of advice bullets every successful analysis carries.
pub const ADVICE_COUNT: usize = 8;

/// Career advice extracted from a CV analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceResult {
    pub job_titles: Vec<String>,
    pub advice_bullets: Vec<String>,
}

impl AdviceResult {
    pub fn titles_markdown(&self) -> String {
        markdown_list(&self.job_titles, "- No titles found.")
    }

    pub fn advice_markdown(&self) -> String {
        markdown_list(&self.advice_bullets, "- No advice found.")
    }
}

/// Raw ranking text as returned by the model. By convention it holds
/// `Title: <job title>` markers for each pick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingResult {
    pub ai_job_matches: String,
}

fn markdown_list(items: &[String], placeholder: &str) -> String {
    if items.is_empty() {
        return placeholder.to_string();
    }

    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_lists_each_item() {
        let advice = AdviceResult {
            job_titles: vec!["Data Analyst".to_string(), "BI Developer".to_string()],
            advice_bullets: vec![],
        };
        assert_eq!(advice.titles_markdown(), "- Data Analyst\n- BI Developer");
    }

    #[test]
    fn test_markdown_placeholder_when_empty() {
        let advice = AdviceResult {
            job_titles: vec![],
            advice_bullets: vec![],
        };
        assert_eq!(advice.titles_markdown(), "- No titles found.");
        assert_eq!(advice.advice_markdown(), "- No advice found.");
    }
}
