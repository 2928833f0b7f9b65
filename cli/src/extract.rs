use std::path::{Path, PathBuf};

use persistence::JobBoard;
use posting_extractor::{extract_jobs, JobPosting, PageFetcher};
use tokio::io::AsyncReadExt;

use crate::{Error, Result};

async fn read_markup(file: Option<PathBuf>) -> Result<String> {
    let markup = match file {
        Some(path) => {
            log::info!("reading markup from {}", path.display());
            tokio::fs::read_to_string(path).await?
        }
        None => {
            log::info!("reading markup from stdin");
            let mut markup = String::new();
            tokio::io::stdin().read_to_string(&mut markup).await?;
            markup
        }
    };
    Ok(markup)
}

fn print_jobs(jobs: &[JobPosting]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(jobs)?);
    Ok(())
}

/// Manual paste path: whatever the markup yields becomes the stored list.
pub async fn extract(store: &Path, file: Option<PathBuf>) -> Result<()> {
    let markup = read_markup(file).await?;
    if markup.trim().is_empty() {
        log::warn!("no markup given, leaving the stored jobs untouched");
        return Ok(());
    }
    let jobs = extract_jobs(&markup);
    let mut board = JobBoard::open(store)?;
    board.replace_all(jobs)?;
    print_jobs(board.jobs())
}

pub async fn fetch(store: &Path, url: Option<String>, proxy: Option<String>) -> Result<()> {
    let mut board = JobBoard::open(store)?;
    let url = match url.or_else(|| board.last_fetch_url().map(String::from)) {
        Some(url) => url,
        None => return Err(Error::MissingUrl),
    };
    board.set_last_fetch_url(&url)?;

    let client = reqwest::Client::new();
    let fetcher = match proxy {
        Some(proxy) => PageFetcher::with_proxy(client, &proxy),
        None => PageFetcher::new(client),
    };
    let markup = match fetcher.fetch_page(&url).await {
        Ok(markup) => markup,
        Err(e) => {
            log::warn!("direct fetch failed: {}", e);
            suggest_manual_input(&url);
            return Ok(());
        }
    };

    let jobs = extract_jobs(&markup);
    if jobs.is_empty() {
        log::warn!("no postings found at {}", url);
        suggest_manual_input(&url);
        return Ok(());
    }
    board.replace_all(jobs)?;
    print_jobs(board.jobs())
}

fn suggest_manual_input(url: &str) {
    eprintln!(
        "Could not extract postings from {}. Save the page source and run `extract --file <page.html>` instead.",
        url
    );
}
