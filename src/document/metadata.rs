//! Metadata normalization
//!
//! Maps backend attributes onto the canonical [`DocumentMetadata`] schema.

use chrono::{NaiveDate, NaiveDateTime};

use super::types::{DocumentMetadata, RawAttributes};

/// Output format for document dates
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Build canonical metadata from raw backend attributes
pub fn normalize(page_count: usize, raw: &RawAttributes) -> DocumentMetadata {
    DocumentMetadata {
        length: page_count,
        author: raw.author.clone().unwrap_or_default(),
        creation_date: raw.creation_date.as_deref().and_then(format_pdf_date),
        modification_date: raw.modification_date.as_deref().and_then(format_pdf_date),
        creator: raw.creator.clone().unwrap_or_default(),
        producer: raw.producer.clone().unwrap_or_default(),
        keywords: raw.keywords.as_deref().map(split_keywords),
        title: raw.title.clone().unwrap_or_default(),
        subject: raw.subject.clone().unwrap_or_default(),
    }
}

/// Split a comma-separated keyword string, trimming spaces around each entry
pub fn split_keywords(keywords: &str) -> Vec<String> {
    keywords
        .split(',')
        .map(|k| k.trim_matches(' ').to_string())
        .collect()
}

/// Render a PDF date string as `YYYY-MM-DD HH:MM:SS`
///
/// Returns `None` when the value is not a PDF date.
pub fn format_pdf_date(raw: &str) -> Option<String> {
    let parsed = parse_pdf_date(raw);
    if parsed.is_none() {
        tracing::debug!("Ignoring unparseable PDF date: {:?}", raw);
    }
    parsed.map(|dt| dt.format(DATE_FORMAT).to_string())
}

/// Parse `D:YYYYMMDDHHmmSSOHH'mm'`
///
/// Everything after the year is optional, but each field present must be
/// complete: a truncated field such as `D:20215` is rejected. The timezone
/// suffix is ignored, so the result is the document's wall-clock time.
pub fn parse_pdf_date(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    let body = trimmed.strip_prefix("D:").unwrap_or(trimmed);

    let digits: String = body.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.len() < 4 || digits.len() % 2 != 0 {
        return None;
    }

    let field = |start: usize, len: usize, default: u32| -> Option<u32> {
        match digits.get(start..start + len) {
            Some(s) => s.parse().ok(),
            None => Some(default),
        }
    };

    let year: i32 = digits[0..4].parse().ok()?;
    let month = field(4, 2, 1)?;
    let day = field(6, 2, 1)?;
    let hour = field(8, 2, 0)?;
    let minute = field(10, 2, 0)?;
    let second = field(12, 2, 0)?;

    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
}
