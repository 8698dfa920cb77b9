//! Core document types

use serde::{Deserialize, Serialize};

/// Document attributes as reported by a backend, before normalization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAttributes {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    /// Comma-separated keyword string
    pub keywords: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    /// PDF date string (`D:YYYYMMDDHHmmSS...`)
    pub creation_date: Option<String>,
    /// PDF date string (`D:YYYYMMDDHHmmSS...`)
    pub modification_date: Option<String>,
}

/// Canonical document metadata returned by `initDoc`
///
/// String attributes are never null; dates and keywords are null when
/// the document does not carry them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    /// Page count
    pub length: usize,
    pub author: String,
    /// Formatted as `YYYY-MM-DD HH:MM:SS`
    pub creation_date: Option<String>,
    /// Formatted as `YYYY-MM-DD HH:MM:SS`
    pub modification_date: Option<String>,
    pub creator: String,
    pub producer: String,
    pub keywords: Option<Vec<String>>,
    pub title: String,
    pub subject: String,
}

/// Text request for a set of pages (1-indexed)
///
/// Page numbers may repeat or fall outside the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageTextRequest {
    pub path: String,
    pub page_numbers: Vec<i64>,
}
