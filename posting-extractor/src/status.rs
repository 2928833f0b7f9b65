use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};
use lazy_static::lazy_static;
use regex::Regex;

use crate::types::{JobStatus, NOT_AVAILABLE};

const DATE_TIME_FORMATS: [&str; 14] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M %p",
    "%B %d, %Y %I:%M %p",
    "%B %d, %Y %H:%M",
    "%b %d, %Y %I:%M %p",
    "%b %d, %Y %H:%M",
    "%B %d %Y %I:%M %p",
    "%d %B %Y %H:%M",
    "%d %b %Y %H:%M",
];

const DATE_FORMATS: [&str; 12] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%A, %B %d, %Y",
    "%a, %b %d, %Y",
    "%a %b %d %Y",
];

/// Tried on "1 <text>" so that "December 2030" reads as its first day.
const MONTH_YEAR_FORMATS: [&str; 2] = ["%d %B %Y", "%d %b %Y"];

const EXPIRED_KEYWORDS: [&str; 2] = ["passed", "closed"];

/// Day-of-month fields can swallow the leading digits of a year
/// ("December 2030" as the 20th of December, year 30).
fn four_digit_year(date: &NaiveDate) -> bool {
    (1000..=9999).contains(&date.year())
}

/// "Mar. 15" -> "Mar 15", "Sept" -> "Sep".
fn normalize(text: &str) -> String {
    lazy_static! {
        static ref ABBREVIATION_DOT: Regex = Regex::new(r"([A-Za-z])\.(\s|$)").unwrap();
        static ref SEPT: Regex = Regex::new(r"(?i)\bsept\b").unwrap();
    }
    let text = ABBREVIATION_DOT.replace_all(text.trim(), "$1$2");
    SEPT.replace_all(&text, "Sep").into_owned()
}

fn parse_naive(text: &str) -> Option<NaiveDateTime> {
    let date_time = DATE_TIME_FORMATS.iter().find_map(|fmt| {
        NaiveDateTime::parse_from_str(text, fmt)
            .ok()
            .filter(|dt| four_digit_year(&dt.date()))
    });
    let date = || {
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok().filter(four_digit_year))
            .or_else(|| {
                let first_of_month = format!("1 {}", text);
                MONTH_YEAR_FORMATS.iter().find_map(|fmt| {
                    NaiveDate::parse_from_str(&first_of_month, fmt)
                        .ok()
                        .filter(four_digit_year)
                })
            })
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    };
    date_time.or_else(date)
}

/// Tries to read a free-text deadline as a point in time.
/// Dates without a time of day are taken as midnight UTC.
pub fn parse_deadline(text: &str) -> Option<DateTime<Utc>> {
    let text = normalize(text);
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(&text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(&text) {
        return Some(dt.with_timezone(&Utc));
    }
    parse_naive(&text).map(|naive| Utc.from_utc_datetime(&naive))
}

/// Decides whether a posting is still open from its deadline text.
///
/// A deadline that reads as a calendar date expires once that moment is
/// behind `now`. Anything else falls back to looking for "passed" or
/// "closed" in the text, and is otherwise considered available.
pub fn classify(deadline: &str, now: DateTime<Utc>) -> JobStatus {
    if deadline == NOT_AVAILABLE {
        return JobStatus::Available;
    }
    match parse_deadline(deadline) {
        Some(date) if date < now => JobStatus::Expired,
        Some(_) => JobStatus::Available,
        None => {
            let lowered = deadline.to_lowercase();
            if EXPIRED_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
                JobStatus::Expired
            } else {
                JobStatus::Available
            }
        }
    }
}
