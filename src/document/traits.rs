//! Document traits
//!
//! Backend-agnostic interfaces for loading PDFs and extracting page text.
//! Implementations live in `crate::formats::pdf`.

use std::path::Path;

use super::error::BackendResult;
use super::types::RawAttributes;

/// A PDF engine able to open documents
///
/// Calls are blocking and are only made from worker threads.
pub trait PdfBackend: Send + Sync {
    /// Short backend name for logs and health output
    fn name(&self) -> &'static str;

    /// Open and decrypt the document at `path`
    ///
    /// An empty `password` means "no password supplied".
    fn load(&self, path: &Path, password: &str) -> BackendResult<Box<dyn PdfDocument>>;
}

/// An opened, decrypted PDF
///
/// Implementations need not be thread-safe; the cache serializes every
/// call against the same document.
pub trait PdfDocument: Send {
    /// Number of pages
    fn page_count(&self) -> usize;

    /// Extract plain text from a page (0-indexed)
    fn extract_page_text(&mut self, page_index: usize) -> BackendResult<String>;

    /// Raw info dictionary attributes, empty values reported as `None`
    fn attributes(&self) -> RawAttributes;
}
