use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Employment arrangement inferred from a search snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EmploymentType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Internship,
    Contract,
    Temporary,
    Unknown,
}

impl EmploymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentType::FullTime => "Full-time",
            EmploymentType::PartTime => "Part-time",
            EmploymentType::Internship => "Internship",
            EmploymentType::Contract => "Contract",
            EmploymentType::Temporary => "Temporary",
            EmploymentType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for EmploymentType {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "full-time" | "full" | "fulltime" => EmploymentType::FullTime,
            "part-time" | "part" | "parttime" => EmploymentType::PartTime,
            "internship" | "intern" => EmploymentType::Internship,
            "contract" => EmploymentType::Contract,
            "temporary" | "temp" => EmploymentType::Temporary,
            _ => EmploymentType::Unknown,
        }
    }
}

/// Which external site produced a record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum JobSource {
    LinkedIn,
    Bayt,
    Custom(String),
}

impl fmt::Display for JobSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobSource::LinkedIn => f.write_str("LinkedIn"),
            JobSource::Bayt => f.write_str("Bayt"),
            JobSource::Custom(domain) => f.write_str(domain),
        }
    }
}

impl From<&str> for JobSource {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "linkedin" => JobSource::LinkedIn,
            "bayt" => JobSource::Bayt,
            _ => JobSource::Custom(s.to_string()),
        }
    }
}

/// One discovered job posting, built once per raw search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub link: String,
    pub description: String,
    pub location: String,
    pub employment_type: EmploymentType,
    pub posted_at: DateTime<Utc>,
    pub source: JobSource,
}

impl JobRecord {
    /// Identity used when merging result lists from several sources.
    pub fn dedup_key(&self) -> (String, String) {
        (self.title.to_lowercase(), self.link.clone())
    }
}
