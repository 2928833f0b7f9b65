pub mod extractor;
pub mod fetch;
pub mod markup;
pub mod rules;
pub mod status;
pub mod types;

pub use extractor::{extract_from, extract_jobs, extract_jobs_at};
pub use fetch::PageFetcher;
pub use types::{Error, JobPosting, JobStatus, Metadata, Result};
