use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use posting_extractor::{JobPosting, JobStatus};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("File error: '{0}'")]
    IoError(#[from] std::io::Error),
    #[error("Malformed job store: '{0}'")]
    Json(#[from] serde_json::Error),
    #[error("No job with id: '{0}'")]
    UnknownJob(String),
    #[error("Jobs can only be marked applied or skipped, not '{0}'")]
    InvalidStatus(JobStatus),
}

#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct StoredBoard {
    #[serde(skip_serializing_if = "Option::is_none")]
    saved_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_fetch_url: Option<String>,
    #[serde(default)]
    jobs: Vec<JobPosting>,
}

/// The extracted postings of the local profile, kept in a single JSON file.
pub struct JobBoard {
    path: PathBuf,
    board: StoredBoard,
}

impl JobBoard {
    /// Loads the board at `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let board = match fs::read_to_string(&path) {
            Ok(data) => serde_json::from_str(&data)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("no job store at {}, starting empty", path.display());
                StoredBoard::default()
            }
            Err(e) => return Err(e.into()),
        };
        log::debug!("loaded {} jobs from {}", board.jobs.len(), path.display());
        Ok(Self { path, board })
    }

    pub fn jobs(&self) -> &[JobPosting] {
        &self.board.jobs
    }

    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        self.board.saved_at
    }

    pub fn last_fetch_url(&self) -> Option<&str> {
        self.board.last_fetch_url.as_deref()
    }

    /// Remembers the page most recently fetched, so the next fetch can reuse it.
    pub fn set_last_fetch_url(&mut self, url: &str) -> Result<()> {
        self.board.last_fetch_url = Some(url.to_owned());
        self.save()
    }

    /// Drops whatever was stored before and keeps `jobs` as the new list.
    pub fn replace_all(&mut self, jobs: Vec<JobPosting>) -> Result<()> {
        log::info!(
            "replacing {} stored jobs with {} new ones",
            self.board.jobs.len(),
            jobs.len()
        );
        self.board.jobs = jobs;
        self.save()
    }

    pub fn mark(&mut self, id: &str, status: JobStatus) -> Result<&JobPosting> {
        if !matches!(status, JobStatus::Applied | JobStatus::Skipped) {
            return Err(Error::InvalidStatus(status));
        }
        let index = self
            .board
            .jobs
            .iter()
            .position(|job| job.id == id)
            .ok_or_else(|| Error::UnknownJob(id.to_owned()))?;
        self.board.jobs[index].status = status;
        log::info!("marked {} as {}", id, status);
        self.save()?;
        Ok(&self.board.jobs[index])
    }

    pub fn filter(&self, status: Option<JobStatus>) -> Vec<&JobPosting> {
        self.board
            .jobs
            .iter()
            .filter(|job| status.map_or(true, |s| job.status == s))
            .collect()
    }

    /// Number of jobs per status, zero counts included.
    pub fn counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts: BTreeMap<&'static str, usize> =
            JobStatus::ALL.iter().map(|s| (s.as_str(), 0)).collect();
        for job in &self.board.jobs {
            *counts.entry(job.status.as_str()).or_default() += 1;
        }
        counts
    }

    fn save(&mut self) -> Result<()> {
        self.board.saved_at = Some(Utc::now());
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(&self.board)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;
        log::debug!("saved {} jobs to {}", self.board.jobs.len(), self.path.display());
        Ok(())
    }
}
