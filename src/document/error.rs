//! Document error types
//!
//! Error taxonomy for loading cached documents and extracting their text.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure signal reported by a PDF backend
#[derive(Debug, Error)]
pub enum BackendError {
    /// File does not exist
    #[error("File not found: {0}")]
    NotFound(String),

    /// File exists but the backend could not parse it
    #[error("Unreadable document: {0}")]
    Unreadable(String),

    /// Document is encrypted and the supplied password is empty
    #[error("Password required for encrypted document")]
    PasswordRequired,

    /// Document is encrypted and the supplied password was rejected
    #[error("Invalid password for encrypted document")]
    PasswordRejected,

    /// Text extraction failed for one page
    #[error("Text extraction error: {0}")]
    Extraction(String),
}

impl BackendError {
    /// Whether the failure came from decryption rather than from the file itself
    pub fn is_password_failure(&self) -> bool {
        matches!(self, Self::PasswordRequired | Self::PasswordRejected)
    }
}

/// Backend result alias
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Unified document error type
#[derive(Debug, Error)]
pub enum DocumentError {
    /// File missing, unreadable, or rejected for a non-password reason
    #[error("File path is invalid: {0}")]
    InvalidPath(String),

    /// Backend could not decrypt with the supplied password
    #[error("The password is invalid: {0}")]
    InvalidPassword(String),

    /// No usable document for an operation that requires one
    #[error("Unable to retrieve the document: {0}")]
    DocError(String),

    /// Requested page is outside `[1, page_count]`
    #[error("Page {page} not found (document has {page_count} pages)")]
    PageOutOfRange { page: i64, page_count: usize },

    /// A single page's text could not be produced
    #[error("Text extraction failed for page {page}: {reason}")]
    ExtractionFailure { page: i64, reason: String },
}

impl DocumentError {
    /// Map a backend load failure for `path` onto the public taxonomy
    pub fn from_load(path: &str, err: BackendError) -> Self {
        if err.is_password_failure() {
            DocumentError::InvalidPassword(format!("{}: {}", path, err))
        } else {
            DocumentError::InvalidPath(format!("{}: {}", path, err))
        }
    }

    /// Wire error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            DocumentError::InvalidPath(_) => ErrorCode::InvalidPath,
            DocumentError::InvalidPassword(_) => ErrorCode::InvalidPassword,
            DocumentError::DocError(_)
            | DocumentError::PageOutOfRange { .. }
            | DocumentError::ExtractionFailure { .. } => ErrorCode::DocError,
        }
    }
}

/// Result type alias for document operations
pub type DocumentResult<T> = std::result::Result<T, DocumentError>;

/// Error codes delivered to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidPath,
    InvalidPassword,
    DocError,
    InvalidArguments,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidPath => "INVALID_PATH",
            ErrorCode::InvalidPassword => "INVALID_PASSWORD",
            ErrorCode::DocError => "DOC_ERROR",
            ErrorCode::InvalidArguments => "INVALID_ARGUMENTS",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
