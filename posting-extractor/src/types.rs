use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Request error: '{0}'")]
    Request(#[from] reqwest::Error),
    #[error("Failed to fetch page through proxy: '{0}'")]
    RequestNotOk(String),
    #[error("Content not found in proxy response: '{0}'")]
    ContentNotFound(String),
}

pub const NOT_SPECIFIED: &str = "Not specified";
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Available,
    Expired,
    Applied,
    Skipped,
}

impl JobStatus {
    pub const ALL: [JobStatus; 4] = [
        JobStatus::Available,
        JobStatus::Expired,
        JobStatus::Applied,
        JobStatus::Skipped,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Available => "available",
            JobStatus::Expired => "expired",
            JobStatus::Applied => "applied",
            JobStatus::Skipped => "skipped",
        }
    }
}

impl Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for JobStatus {
    type Error = String;

    fn try_from(s: &str) -> std::result::Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "available" => Ok(JobStatus::Available),
            "expired" => Ok(JobStatus::Expired),
            "applied" => Ok(JobStatus::Applied),
            "skipped" => Ok(JobStatus::Skipped),
            other => Err(format!("unknown job status: {}", other)),
        }
    }
}

/// Structured fields read from the paragraph right after a posting heading.
/// Absent fields keep their sentinel values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub location: String,
    pub positions: String,
    pub student_type: String,
    pub deadline: String,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            location: NOT_SPECIFIED.to_owned(),
            positions: NOT_AVAILABLE.to_owned(),
            student_type: NOT_AVAILABLE.to_owned(),
            deadline: NOT_AVAILABLE.to_owned(),
        }
    }
}

/// One job or internship listing extracted from page markup.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub id: String,
    pub title: String,
    pub location: String,
    pub positions: String,
    pub student_type: String,
    pub deadline: String,
    pub description: String,
    pub status: JobStatus,
}

impl JobPosting {
    pub fn new(
        index: usize,
        title: String,
        metadata: Metadata,
        description: String,
        status: JobStatus,
    ) -> Self {
        Self {
            id: posting_id(index, &title),
            title,
            location: metadata.location,
            positions: metadata.positions,
            student_type: metadata.student_type,
            deadline: metadata.deadline,
            description,
            status,
        }
    }
}

/// `job-{index}-{slug}`, the slug being the lower-cased title with every
/// whitespace run collapsed into a single hyphen.
pub fn posting_id(index: usize, title: &str) -> String {
    let slug = title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();
    format!("job-{}-{}", index, slug)
}
