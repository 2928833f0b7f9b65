use chrono::{DateTime, Utc};

use crate::markup::{HtmlDocument, MarkupDocument, MarkupElement};
use crate::rules::{apply_label, label_content};
use crate::status::classify;
use crate::types::{JobPosting, Metadata};

pub const HEADING_TAG: &str = "h3";
pub const HEADING_CLASS: &str = "wp-block-heading";
const PARAGRAPH_TAG: &str = "p";

/// Extracts every posting from page markup, classifying deadlines against
/// the current time.
pub fn extract_jobs(html: &str) -> Vec<JobPosting> {
    extract_jobs_at(html, Utc::now())
}

pub fn extract_jobs_at(html: &str, now: DateTime<Utc>) -> Vec<JobPosting> {
    let doc = HtmlDocument::parse(html);
    extract_from(&doc, now)
}

/// Walks the block headings of `doc` in order and turns each one that looks
/// like a job title into a [`JobPosting`].
pub fn extract_from<D: MarkupDocument>(doc: &D, now: DateTime<Utc>) -> Vec<JobPosting> {
    let headings = doc.select_all(HEADING_TAG, HEADING_CLASS);
    log::debug!("found {} block headings", headings.len());

    let mut jobs = Vec::with_capacity(headings.len());
    for (index, heading) in headings.iter().enumerate() {
        let title = heading.trimmed_text();
        if !is_job_title(&title) {
            log::debug!("skipping heading {}: '{}'", index, title);
            continue;
        }

        let (metadata, description) = match heading
            .next_sibling_element()
            .filter(|el| el.tag_name() == PARAGRAPH_TAG)
        {
            Some(info) => (read_metadata(&info), read_description(&info)),
            None => (Metadata::default(), String::new()),
        };
        let status = classify(&metadata.deadline, now);
        let job = JobPosting::new(index, title, metadata, description, status);
        log::debug!("extracted {} ({})", job.id, job.status);
        jobs.push(job);
    }

    log::info!(
        "extracted {} postings from {} headings",
        jobs.len(),
        headings.len()
    );
    jobs
}

/// Site menus and search widgets share the heading markup.
fn is_job_title(title: &str) -> bool {
    title.chars().count() >= 3 && !title.to_lowercase().contains("search")
}

fn read_metadata<E: MarkupElement>(info: &E) -> Metadata {
    let mut metadata = Metadata::default();
    if let Some(em) = info.first_descendant("em") {
        let location = em.trimmed_text();
        if !location.is_empty() {
            metadata.location = location;
        }
    }
    for strong in info.descendants("strong") {
        let content = strong
            .next_sibling_text()
            .map(|text| label_content(&text))
            .unwrap_or_default();
        apply_label(&mut metadata, &strong.text(), &content);
    }
    metadata
}

/// Paragraphs after the metadata block, up to the next heading or the first
/// non-paragraph sibling.
fn read_description<E: MarkupElement>(info: &E) -> String {
    let mut description = String::new();
    let mut current = info.next_sibling_element();
    while let Some(para) = current {
        if para.tag_name() != PARAGRAPH_TAG || para.has_class(HEADING_CLASS) {
            break;
        }
        description.push_str(&para.trimmed_text());
        description.push_str("\n\n");
        current = para.next_sibling_element();
    }
    description.trim().to_owned()
}

#[cfg(test)]
mod test {
    use chrono::TimeZone;

    use super::*;
    use crate::types::JobStatus;

    const BOARD: &str = r#"
        <html><body>
        <h3 class="wp-block-heading">Search Positions</h3>
        <h3 class="wp-block-heading">Software Engineering Intern</h3>
        <p><em>Remote, USA</em><br><strong>Positions</strong>: 3<br>
           <strong>Type of Student</strong>: Juniors and Seniors<br>
           <strong>Deadline</strong>: January 1, 2020</p>
        <p>Build internal tools.</p>
        <p>  Work with the platform team.  </p>
        <h3 class="wp-block-heading">Data   Analyst</h3>
        <p><em> Boston, MA </em> <strong>Deadline:</strong> Rolling</p>
        <p>Analyze things.</p>
        <ul><li>Not part of the description</li></ul>
        <p>Stray paragraph after a list.</p>
        <h3 class="wp-block-heading">Se</h3>
        <h3 class="wp-block-heading">Lab Assistant</h3>
        <div>No metadata here</div>
        </body></html>
    "#;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_extract_board() {
        let _ = env_logger::builder().is_test(true).try_init();
        let jobs = extract_jobs_at(BOARD, now());
        let titles: Vec<&str> = jobs.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Software Engineering Intern", "Data   Analyst", "Lab Assistant"]
        );

        let intern = &jobs[0];
        assert_eq!(intern.id, "job-1-software-engineering-intern");
        assert_eq!(intern.location, "Remote, USA");
        assert_eq!(intern.positions, "3");
        assert_eq!(intern.student_type, "Juniors and Seniors");
        assert_eq!(intern.deadline, "January 1, 2020");
        assert_eq!(
            intern.description,
            "Build internal tools.\n\nWork with the platform team."
        );
        assert_eq!(intern.status, JobStatus::Expired);
    }

    #[test]
    fn test_description_stops_at_first_non_paragraph() {
        let jobs = extract_jobs_at(BOARD, now());
        let analyst = &jobs[1];
        assert_eq!(analyst.id, "job-2-data-analyst");
        assert_eq!(analyst.location, "Boston, MA");
        assert_eq!(analyst.positions, "N/A");
        assert_eq!(analyst.deadline, "Rolling");
        assert_eq!(analyst.status, JobStatus::Available);
        assert_eq!(analyst.description, "Analyze things.");
    }

    #[test]
    fn test_heading_without_paragraph_uses_sentinels() {
        let jobs = extract_jobs_at(BOARD, now());
        let lab = &jobs[2];
        assert_eq!(lab.id, "job-4-lab-assistant");
        assert_eq!(lab.location, "Not specified");
        assert_eq!(lab.positions, "N/A");
        assert_eq!(lab.student_type, "N/A");
        assert_eq!(lab.deadline, "N/A");
        assert_eq!(lab.description, "");
        assert_eq!(lab.status, JobStatus::Available);
    }

    #[test]
    fn test_last_heading_without_sibling() {
        let html = r#"<h3 class="wp-block-heading">Lab Fellow</h3>"#;
        let jobs = extract_jobs(html);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id, "job-0-lab-fellow");
        assert_eq!(jobs[0].location, "Not specified");
        assert_eq!(jobs[0].description, "");
    }

    #[test]
    fn test_title_filtering() {
        let html = r#"
            <h3 class="wp-block-heading">Search</h3>
            <h3 class="wp-block-heading">Se</h3>
            <h3 class="wp-block-heading">   </h3>
            <h3 class="wp-block-heading">Job SEARCH tips</h3>
            <h3 class="wp-block-heading">Research Fellow</h3>
        "#;
        assert!(extract_jobs_at(html, now()).is_empty());
    }

    #[test]
    fn test_description_never_bleeds_into_next_posting() {
        let html = r#"
            <h3 class="wp-block-heading">First Role</h3>
            <p><strong>Deadline</strong>: Passed</p>
            <p>First body.</p>
            <p class="wp-block-heading">Second Role</p>
            <p>Second body.</p>
            <h3 class="wp-block-heading">Third Role</h3>
            <p>Meta only</p>
            <p>Third body.</p>
        "#;
        let jobs = extract_jobs_at(html, now());
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].description, "First body.");
        assert_eq!(jobs[0].status, JobStatus::Expired);
        assert_eq!(jobs[1].id, "job-1-third-role");
        assert_eq!(jobs[1].description, "Third body.");
    }

    #[test]
    fn test_metadata_last_match_wins_and_closed_fallback() {
        let html = r#"
            <h3 class="wp-block-heading">Archivist</h3>
            <p><em></em>
               <strong>Positions</strong>: 1
               <strong>Open positions</strong>:  4
               <strong>Deadline</strong>: Applications Closed
               <strong>Stipend</strong>: yes</p>
        "#;
        let jobs = extract_jobs_at(html, now());
        assert_eq!(jobs[0].location, "Not specified");
        assert_eq!(jobs[0].positions, "4");
        assert_eq!(jobs[0].deadline, "Applications Closed");
        assert_eq!(jobs[0].status, JobStatus::Expired);
    }

    #[test]
    fn test_label_without_following_text() {
        let html = r#"
            <h3 class="wp-block-heading">Curator</h3>
            <p><strong>Deadline</strong></p>
        "#;
        let jobs = extract_jobs_at(html, now());
        assert_eq!(jobs[0].deadline, "");
        assert_eq!(jobs[0].status, JobStatus::Available);
    }

    #[test]
    fn test_extraction_is_repeatable() {
        assert_eq!(extract_jobs(BOARD), extract_jobs(BOARD));
        assert!(extract_jobs("").is_empty());
        assert!(extract_jobs("<<<not really html").is_empty());
    }
}
