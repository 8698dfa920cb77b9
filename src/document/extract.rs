//! Page text extraction policy
//!
//! A page that is out of range or fails to extract yields an empty string.
//! The same rule applies to single-page and batch requests, so a batch
//! never aborts because of one bad page.

use super::cache::DocumentHandle;
use super::error::DocumentError;

/// Extract one 1-indexed page, degrading any failure to `""`
pub fn extract_page_or_empty(handle: &DocumentHandle, page_number: i64) -> String {
    match handle.extract_page_text(page_number) {
        Ok(text) => text,
        Err(DocumentError::PageOutOfRange { page, page_count }) => {
            tracing::debug!(
                "Page {} out of range for {} ({} pages)",
                page,
                handle.path(),
                page_count
            );
            String::new()
        }
        Err(e) => {
            tracing::warn!("{} in {}", e, handle.path());
            String::new()
        }
    }
}

/// Extract each requested page independently
///
/// The output has the same length and order as `page_numbers`.
pub fn extract_pages(handle: &DocumentHandle, page_numbers: &[i64]) -> Vec<String> {
    page_numbers
        .iter()
        .map(|&page| extract_page_or_empty(handle, page))
        .collect()
}
