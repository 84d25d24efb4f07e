use anyhow::Result;
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static DIFFICULTY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(.*?)\]").unwrap());
static PROBLEM_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[문제 링크\]\((.*?)\)").unwrap());
static SUBMISSION_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"### 제출 일자\s*\n\s*(\d{4})년 (\d{1,2})월 (\d{1,2})일 (\d{2}):(\d{2}):(\d{2})")
        .unwrap()
});

/// Submission dates are written in KST (UTC+9).
static KST: Lazy<FixedOffset> = Lazy::new(|| FixedOffset::east_opt(9 * 3600).unwrap());

/// Returns the first bracketed tag of a commit message, or "Unknown".
pub fn extract_difficulty(text: &str) -> String {
    DIFFICULTY
        .captures(text)
        .map(|captures| captures[1].to_string())
        .unwrap_or(String::from("Unknown"))
}

/// Returns the URL of the first `[문제 링크](...)` line of a description.
pub fn extract_problem_link(markdown: &str) -> Option<String> {
    PROBLEM_LINK
        .captures(markdown)
        .map(|captures| captures[1].to_string())
}

/// Parses the `제출 일자` line of a description into a UTC timestamp.
///
/// The line is written as a local KST wall clock time. A description without
/// the line yields `None`; a line whose components do not form a valid
/// calendar date is an error.
pub fn extract_submission_date(markdown: &str) -> Result<Option<DateTime<Utc>>> {
    let captures = match SUBMISSION_DATE.captures(markdown) {
        Some(captures) => captures,
        None => return Ok(None),
    };

    let year: i32 = captures[1].parse()?;
    let month: u32 = captures[2].parse()?;
    let day: u32 = captures[3].parse()?;
    let hour: u32 = captures[4].parse()?;
    let minute: u32 = captures[5].parse()?;
    let second: u32 = captures[6].parse()?;

    let naive = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .ok_or_else(|| {
            anyhow::anyhow!(
                "{}-{}-{} {}:{}:{} is not a valid submission date",
                year,
                month,
                day,
                hour,
                minute,
                second
            )
        })?;
    let submitted_at = KST
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| anyhow::anyhow!("submission date {} is ambiguous in UTC+9", naive))?
        .with_timezone(&Utc);

    Ok(Some(submitted_at))
}

/// Returns the first path segment as the site name, or "Unknown" for paths
/// without a directory separator.
pub fn extract_site_name(path: &str) -> String {
    match path.split_once('/') {
        Some((site, _)) => String::from(site),
        None => String::from("Unknown"),
    }
}
