//! Single-slot document cache
//!
//! Keeps at most one opened document, keyed by its path string.
//!
//! # Thread Safety
//!
//! The slot is guarded by one `parking_lot::Mutex`: checking the path,
//! loading, and swapping the entry all happen in the same critical section.
//! Handles are shared as `Arc<DocumentHandle>`, so evicting the entry only
//! drops the cache's reference. A request that obtained the handle before
//! the eviction keeps extracting from it, and the backend document is
//! released when the last reference goes away.
//!
//! Backend documents are not assumed thread-safe. Each handle serializes
//! its own backend calls with a second mutex.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use super::error::{DocumentError, DocumentResult};
use super::traits::{PdfBackend, PdfDocument};
use super::types::RawAttributes;

/// An opened document shared between the cache and in-flight requests
pub struct DocumentHandle {
    path: String,
    page_count: usize,
    document: Mutex<Box<dyn PdfDocument>>,
}

impl DocumentHandle {
    fn new(path: &str, document: Box<dyn PdfDocument>) -> Self {
        Self {
            path: path.to_string(),
            page_count: document.page_count(),
            document: Mutex::new(document),
        }
    }

    /// Path the document was opened from
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Number of pages
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Raw info dictionary attributes
    pub fn attributes(&self) -> RawAttributes {
        self.document.lock().attributes()
    }

    /// Extract the text of a 1-indexed page
    pub fn extract_page_text(&self, page_number: i64) -> DocumentResult<String> {
        if page_number < 1 || page_number as u64 > self.page_count as u64 {
            return Err(DocumentError::PageOutOfRange {
                page: page_number,
                page_count: self.page_count,
            });
        }

        let mut document = self.document.lock();
        document
            .extract_page_text((page_number - 1) as usize)
            .map_err(|e| DocumentError::ExtractionFailure {
                page: page_number,
                reason: e.to_string(),
            })
    }

    /// Extract the first page once, if there is one
    fn warm_up(&self) -> DocumentResult<()> {
        if self.page_count == 0 {
            return Ok(());
        }
        self.extract_page_text(1).map(|_| ())
    }
}

impl Drop for DocumentHandle {
    fn drop(&mut self) {
        tracing::debug!("Released document {}", self.path);
    }
}

impl std::fmt::Debug for DocumentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentHandle")
            .field("path", &self.path)
            .field("page_count", &self.page_count)
            .finish_non_exhaustive()
    }
}

/// The single cache entry
struct CacheEntry {
    path: String,
    handle: Arc<DocumentHandle>,
}

#[derive(Default)]
struct CacheSlot {
    entry: Option<CacheEntry>,
    closed: bool,
}

/// Document cache holding zero or one open document
pub struct DocumentCache {
    backend: Arc<dyn PdfBackend>,
    slot: Mutex<CacheSlot>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    load_failures: AtomicU64,
}

impl DocumentCache {
    /// Create an empty cache over the given backend
    pub fn new(backend: Arc<dyn PdfBackend>) -> Self {
        Self {
            backend,
            slot: Mutex::new(CacheSlot::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            load_failures: AtomicU64::new(0),
        }
    }

    /// Backend name
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Return the cached document for `path`, loading it on a miss
    ///
    /// A hit returns the cached handle without checking `password`.
    /// On a miss a load failure leaves the previous entry in place;
    /// a successful load replaces it.
    pub fn get_or_load(
        &self,
        path: &str,
        password: &str,
        needs_warmup: bool,
    ) -> DocumentResult<Arc<DocumentHandle>> {
        let mut slot = self.slot.lock();

        if slot.closed {
            return Err(DocumentError::DocError("document cache is closed".to_string()));
        }

        if let Some(entry) = slot.entry.as_ref() {
            if entry.path == path {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("Document cache hit: {}", path);
                return Ok(Arc::clone(&entry.handle));
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::info!("Loading document {} with {} backend", path, self.backend.name());

        let document = self.backend.load(Path::new(path), password).map_err(|e| {
            self.load_failures.fetch_add(1, Ordering::Relaxed);
            tracing::warn!("Failed to load {}: {}", path, e);
            DocumentError::from_load(path, e)
        })?;

        let handle = Arc::new(DocumentHandle::new(path, document));

        if needs_warmup {
            if let Err(e) = handle.warm_up() {
                self.load_failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("Warm-up extraction failed for {}: {}", path, e);
                return Err(DocumentError::InvalidPath(format!(
                    "{}: text extraction could not be initialized: {}",
                    path, e
                )));
            }
        }

        let previous = slot.entry.replace(CacheEntry {
            path: path.to_string(),
            handle: Arc::clone(&handle),
        });

        if let Some(previous) = previous {
            self.evictions.fetch_add(1, Ordering::Relaxed);
            tracing::info!(
                "Evicted document {} ({} other holders)",
                previous.path,
                Arc::strong_count(&previous.handle) - 1
            );
        }

        Ok(handle)
    }

    /// Path of the cached document, if any
    pub fn cached_path(&self) -> Option<String> {
        self.slot.lock().entry.as_ref().map(|e| e.path.clone())
    }

    /// Release the cached document and refuse further loads
    pub fn close(&self) {
        let previous = {
            let mut slot = self.slot.lock();
            slot.closed = true;
            slot.entry.take()
        };
        if let Some(previous) = previous {
            tracing::info!("Closed document cache, releasing {}", previous.path);
        }
    }

    /// Whether `close` has been called
    pub fn is_closed(&self) -> bool {
        self.slot.lock().closed
    }

    /// Cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            backend: self.backend.name(),
            cached_path: self.cached_path(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            load_failures: self.load_failures.load(Ordering::Relaxed),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Backend name
    pub backend: &'static str,
    /// Currently cached document path
    pub cached_path: Option<String>,
    /// Requests served from the cached document
    pub hits: u64,
    /// Requests that required a load
    pub misses: u64,
    /// Entries replaced by a different document
    pub evictions: u64,
    /// Loads (including warm-up) that failed
    pub load_failures: u64,
}
