//! Synchronous text extraction service
//!
//! Implements the three operations over a shared [`DocumentCache`]. Every
//! method blocks on backend work and is meant to run on a worker thread.

use std::sync::Arc;

use crate::document::{
    extract_page_or_empty, extract_pages, normalize, CacheStats, DocumentCache, PageTextRequest,
    PdfBackend,
};

use super::request::{
    GetDocPageTextArgs, GetDocTextArgs, InitDocArgs, InitDocReply, PdfTextReply, PdfTextRequest,
    RequestError,
};

/// Text extraction operations over a single-slot document cache
pub struct PdfTextService {
    cache: DocumentCache,
}

impl PdfTextService {
    pub fn new(backend: Arc<dyn PdfBackend>) -> Self {
        Self {
            cache: DocumentCache::new(backend),
        }
    }

    /// Run a request to completion
    pub fn handle(&self, request: &PdfTextRequest) -> Result<PdfTextReply, RequestError> {
        match request {
            PdfTextRequest::InitDoc(args) => self.init_doc(args).map(PdfTextReply::Document),
            PdfTextRequest::GetDocPageText(args) => {
                self.get_doc_page_text(args).map(PdfTextReply::PageText)
            }
            PdfTextRequest::GetDocText(args) => {
                self.get_doc_text(args).map(PdfTextReply::DocumentText)
            }
        }
    }

    /// Open (or reuse) a document and report its page count and metadata
    ///
    /// Unless `fast_init` is set, a freshly loaded document is warmed up by
    /// extracting its first page before it is cached.
    pub fn init_doc(&self, args: &InitDocArgs) -> Result<InitDocReply, RequestError> {
        let handle = self
            .cache
            .get_or_load(&args.path, &args.password, !args.fast_init)?;
        let length = handle.page_count();
        let info = normalize(length, &handle.attributes());

        Ok(InitDocReply { length, info })
    }

    /// Text of one 1-indexed page
    ///
    /// Pages that are out of range or fail to extract yield an empty string.
    pub fn get_doc_page_text(&self, args: &GetDocPageTextArgs) -> Result<String, RequestError> {
        let handle = self.cache.get_or_load(&args.path, "", true)?;
        Ok(extract_page_or_empty(&handle, args.number))
    }

    /// Texts of a batch of 1-indexed pages, in request order
    pub fn get_doc_text(&self, args: &GetDocTextArgs) -> Result<Vec<String>, RequestError> {
        let request = PageTextRequest {
            path: args.path.clone(),
            page_numbers: args.missing_pages_numbers.clone(),
        };
        self.page_texts(&request)
    }

    /// Batch extraction over a [`PageTextRequest`]
    pub fn page_texts(&self, request: &PageTextRequest) -> Result<Vec<String>, RequestError> {
        let handle = self.cache.get_or_load(&request.path, "", true)?;
        Ok(extract_pages(&handle, &request.page_numbers))
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn backend_name(&self) -> &'static str {
        self.cache.backend_name()
    }

    /// Release the cached document; later requests fail with `DOC_ERROR`
    pub fn teardown(&self) {
        self.cache.close();
    }
}
