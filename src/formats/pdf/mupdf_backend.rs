//! PDF backend using MuPDF
//!
//! Enabled with the `mupdf` feature. Uses [`SafeDocument`] for
//! thread-safe access.

use std::path::Path;

use mupdf::MetadataName;

use crate::document::{BackendResult, PdfBackend, PdfDocument, RawAttributes};
use crate::mupdf::SafeDocument;

/// MuPDF implementation of [`PdfBackend`]
#[derive(Debug, Clone, Copy, Default)]
pub struct MupdfBackend;

impl MupdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for MupdfBackend {
    fn name(&self) -> &'static str {
        "mupdf"
    }

    fn load(&self, path: &Path, password: &str) -> BackendResult<Box<dyn PdfDocument>> {
        let doc = SafeDocument::open(path, password)?;
        Ok(Box::new(MupdfDocument { doc }))
    }
}

/// A MuPDF document
pub struct MupdfDocument {
    doc: SafeDocument,
}

impl PdfDocument for MupdfDocument {
    fn page_count(&self) -> usize {
        self.doc.page_count()
    }

    fn extract_page_text(&mut self, page_index: usize) -> BackendResult<String> {
        self.doc.with_doc(|mupdf_doc| {
            let page = mupdf_doc.load_page(page_index as i32)?;
            page.to_text()
        })
    }

    fn attributes(&self) -> RawAttributes {
        let result = self.doc.with_doc(|mupdf_doc| {
            let get_meta = |name: MetadataName| -> Option<String> {
                mupdf_doc.metadata(name).ok().filter(|s| !s.is_empty())
            };

            Ok(RawAttributes {
                title: get_meta(MetadataName::Title),
                author: get_meta(MetadataName::Author),
                subject: get_meta(MetadataName::Subject),
                keywords: get_meta(MetadataName::Keywords),
                creator: get_meta(MetadataName::Creator),
                producer: get_meta(MetadataName::Producer),
                creation_date: get_meta(MetadataName::CreationDate),
                modification_date: get_meta(MetadataName::ModDate),
            })
        });

        result.unwrap_or_else(|e| {
            tracing::warn!("Failed to read MuPDF metadata: {}", e);
            RawAttributes::default()
        })
    }
}
