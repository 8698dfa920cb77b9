//! Document cache and extraction layer
//!
//! Backend-agnostic handling of opened PDF documents.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  DocumentCache                          │
//! │  (single slot: path -> Arc<DocumentHandle>)             │
//! └─────────────────────────────────────────────────────────┘
//!                            │ load on miss
//!                            ▼
//!   ┌─────────────────────────────────────────────────────┐
//!   │          PdfBackend (lopdf | mupdf)                 │
//!   └─────────────────────────────────────────────────────┘
//!                            │
//!                            ▼
//!   ┌─────────────────────────────────────────────────────┐
//!   │  DocumentHandle: per-document lock around the       │
//!   │  backend document, released on last reference       │
//!   └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use pdf_text_server::document::{extract_pages, normalize, DocumentCache};
//! use pdf_text_server::formats::pdf::default_backend;
//!
//! let cache = DocumentCache::new(default_backend());
//! let doc = cache.get_or_load("/books/manual.pdf", "", true)?;
//! let info = normalize(doc.page_count(), &doc.attributes());
//! let texts = extract_pages(&doc, &[1, 2, 3]);
//! ```

mod cache;
mod error;
mod extract;
mod metadata;
mod traits;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{CacheStats, DocumentCache, DocumentHandle};
pub use error::{BackendError, BackendResult, DocumentError, DocumentResult, ErrorCode};
pub use extract::{extract_page_or_empty, extract_pages};
pub use metadata::{format_pdf_date, normalize, parse_pdf_date, split_keywords};
pub use traits::{PdfBackend, PdfDocument};
pub use types::{DocumentMetadata, PageTextRequest, RawAttributes};
