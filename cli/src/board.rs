use std::path::Path;

use persistence::JobBoard;
use posting_extractor::JobStatus;

use crate::Result;

const PREVIEW_CHARS: usize = 150;

fn preview(description: &str) -> String {
    if description.chars().count() <= PREVIEW_CHARS {
        return description.replace('\n', " ");
    }
    let cut: String = description.chars().take(PREVIEW_CHARS).collect();
    format!("{}...", cut.replace('\n', " "))
}

pub fn list(store: &Path, status: Option<JobStatus>) -> Result<()> {
    let board = JobBoard::open(store)?;
    let counts = board
        .counts()
        .into_iter()
        .map(|(status, count)| format!("{} ({})", status.to_uppercase(), count))
        .collect::<Vec<_>>()
        .join("  ");
    println!("ALL ({})  {}", board.jobs().len(), counts);
    for job in board.filter(status) {
        println!();
        println!("[{}] {} ({})", job.status, job.title, job.id);
        println!(
            "    {} | positions: {} | students: {} | deadline: {}",
            job.location, job.positions, job.student_type, job.deadline
        );
        if !job.description.is_empty() {
            println!("    {}", preview(&job.description));
        }
    }
    Ok(())
}

pub fn clear(store: &Path) -> Result<()> {
    let mut board = JobBoard::open(store)?;
    board.replace_all(Vec::new())?;
    println!("Cleared all extracted jobs.");
    Ok(())
}

pub fn mark(store: &Path, id: &str, status: JobStatus) -> Result<()> {
    let mut board = JobBoard::open(store)?;
    let job = board.mark(id, status)?;
    println!("{} -> {}", job.title, job.status);
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_preview_truncates_long_descriptions() {
        let long = "a".repeat(200);
        let short = preview(&long);
        assert_eq!(short.len(), PREVIEW_CHARS + 3);
        assert!(short.ends_with("..."));
        assert_eq!(preview("One.\n\nTwo."), "One.  Two.");
    }

    #[test]
    fn test_mark_and_clear_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("jobs.json");
        let mut board = JobBoard::open(&store).unwrap();
        board
            .replace_all(posting_extractor::extract_jobs(
                r#"<h3 class="wp-block-heading">Park Ranger</h3>"#,
            ))
            .unwrap();

        mark(&store, "job-0-park-ranger", JobStatus::Skipped).unwrap();
        assert_eq!(
            JobBoard::open(&store).unwrap().jobs()[0].status,
            JobStatus::Skipped
        );
        assert!(mark(&store, "job-3-nope", JobStatus::Applied).is_err());

        clear(&store).unwrap();
        assert!(JobBoard::open(&store).unwrap().jobs().is_empty());
        list(&store, None).unwrap();
    }
}
