//! Thread-safe document wrapper for MuPDF
//!
//! # Design
//!
//! MuPDF documents are not thread-safe and cannot be sent between threads.
//! This wrapper:
//!
//! 1. Stores the document path and password
//! 2. Opens (and authenticates) a fresh document for each operation
//! 3. Uses `parking_lot::Mutex` to serialize access
//!
//! No `mupdf::Document` outlives the closure it was opened for.

use std::path::{Path, PathBuf};

use mupdf::Document;
use parking_lot::Mutex;

use crate::document::{BackendError, BackendResult};

/// Thread-safe MuPDF document wrapper
pub struct SafeDocument {
    /// Document location
    path: PathBuf,
    /// Password used to authenticate each reopen
    password: String,
    /// Page count, read once at open time
    page_count: usize,
    /// Mutex for serializing access
    _lock: Mutex<()>,
}

// SAFETY: SafeDocument holds only owned path/password data and a mutex.
// Every MuPDF object is created inside `with_doc` while `_lock` is held
// and dropped before the lock is released, so no MuPDF state is shared
// between threads.
unsafe impl Send for SafeDocument {}
unsafe impl Sync for SafeDocument {}

impl SafeDocument {
    /// Open and authenticate the document at `path`
    pub fn open<P: AsRef<Path>>(path: P, password: &str) -> BackendResult<Self> {
        let path_buf = path.as_ref().to_path_buf();
        if !path_buf.is_file() {
            return Err(BackendError::NotFound(path_buf.display().to_string()));
        }

        let doc = Self::open_document(&path_buf, password)?;
        let page_count = doc
            .page_count()
            .map_err(|e| BackendError::Unreadable(e.to_string()))? as usize;

        Ok(Self {
            path: path_buf,
            password: password.to_string(),
            page_count,
            _lock: Mutex::new(()),
        })
    }

    /// Page count
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Open a fresh document instance, authenticating when it is encrypted
    fn open_document(path: &Path, password: &str) -> BackendResult<Document> {
        let path_str = path.to_string_lossy();
        let mut doc =
            Document::open(&*path_str).map_err(|e| BackendError::Unreadable(e.to_string()))?;

        let needs_password = doc
            .needs_password()
            .map_err(|e| BackendError::Unreadable(e.to_string()))?;
        if needs_password {
            if password.is_empty() {
                return Err(BackendError::PasswordRequired);
            }
            let authenticated = doc
                .authenticate(password)
                .map_err(|e| BackendError::Unreadable(e.to_string()))?;
            if !authenticated {
                return Err(BackendError::PasswordRejected);
            }
        }

        Ok(doc)
    }

    /// Execute a closure with access to the document
    ///
    /// Opens a fresh document, executes the closure, and drops the document
    /// afterward. Access is serialized via mutex.
    pub fn with_doc<F, R>(&self, f: F) -> BackendResult<R>
    where
        F: FnOnce(&Document) -> Result<R, mupdf::Error>,
    {
        let _guard = self._lock.lock();
        let doc = Self::open_document(&self.path, &self.password)?;
        f(&doc).map_err(|e| BackendError::Extraction(e.to_string()))
    }
}
