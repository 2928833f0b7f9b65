mod board;
mod extract;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use posting_extractor::JobStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Extractor(#[from] posting_extractor::Error),
    #[error(transparent)]
    Store(#[from] persistence::Error),
    #[error("Failed to read markup: '{0}'")]
    Input(#[from] std::io::Error),
    #[error("Failed to render output: '{0}'")]
    Output(#[from] serde_json::Error),
    #[error("No url given and no previous fetch to reuse")]
    MissingUrl,
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Parser)]
#[command(author, version, about = "Extract job postings from a listing page and track them locally", long_about = None)]
struct Cli {
    /// JSON file holding the extracted postings
    #[arg(long, env = "JOB_STORE_PATH", default_value = "jobs.json")]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract postings from pasted markup, replacing the stored list
    Extract {
        /// Read markup from this file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Fetch a listing page through the CORS proxy and extract its postings
    Fetch {
        /// Listing page, defaults to the last fetched one
        url: Option<String>,
        /// Alternative proxy endpoint taking a `url` query parameter
        #[arg(long, env = "JOB_PROXY_URL")]
        proxy: Option<String>,
    },
    /// Show stored postings
    List {
        #[arg(long, value_parser = parse_status)]
        status: Option<JobStatus>,
    },
    /// Mark a posting as applied
    Apply { id: String },
    /// Mark a posting as skipped
    Skip { id: String },
    /// Remove every stored posting
    Clear,
}

fn parse_status(s: &str) -> std::result::Result<JobStatus, String> {
    JobStatus::try_from(s)
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Extract { file } => extract::extract(&cli.store, file).await,
        Commands::Fetch { url, proxy } => extract::fetch(&cli.store, url, proxy).await,
        Commands::List { status } => board::list(&cli.store, status),
        Commands::Apply { id } => board::mark(&cli.store, &id, JobStatus::Applied),
        Commands::Skip { id } => board::mark(&cli.store, &id, JobStatus::Skipped),
        Commands::Clear => board::clear(&cli.store),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    env_logger::init();
    let args = Cli::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
