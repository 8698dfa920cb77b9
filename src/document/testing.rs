//! In-memory backend for tests
//!
//! Documents are registered by path with fixed page texts. The backend
//! counts loads, extractions, and releases so tests can check cache
//! behavior without real PDF files.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use super::error::{BackendError, BackendResult};
use super::traits::{PdfBackend, PdfDocument};
use super::types::RawAttributes;

/// Blueprint for a document served by [`ScriptedBackend`]
#[derive(Debug, Clone, Default)]
pub struct ScriptedDocument {
    pages: Vec<String>,
    password: Option<String>,
    failing_pages: HashSet<usize>,
    attributes: RawAttributes,
}

impl ScriptedDocument {
    pub fn with_pages(pages: &[&str]) -> Self {
        Self {
            pages: pages.iter().map(|p| p.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }

    /// Make extraction of a 0-indexed page fail
    pub fn failing_page(mut self, page_index: usize) -> Self {
        self.failing_pages.insert(page_index);
        self
    }

    pub fn with_attributes(mut self, attributes: RawAttributes) -> Self {
        self.attributes = attributes;
        self
    }
}

#[derive(Default)]
struct Counters {
    loads: AtomicUsize,
    extractions: AtomicUsize,
    releases: Mutex<HashMap<String, usize>>,
}

/// Backend serving registered in-memory documents
#[derive(Default)]
pub struct ScriptedBackend {
    documents: Mutex<HashMap<String, ScriptedDocument>>,
    counters: Arc<Counters>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, path: &str, document: ScriptedDocument) {
        self.documents.lock().insert(path.to_string(), document);
    }

    /// Load attempts, including failed ones
    pub fn load_count(&self) -> usize {
        self.counters.loads.load(Ordering::SeqCst)
    }

    pub fn extraction_count(&self) -> usize {
        self.counters.extractions.load(Ordering::SeqCst)
    }

    pub fn release_count(&self, path: &str) -> usize {
        self.counters.releases.lock().get(path).copied().unwrap_or(0)
    }

    pub fn total_release_count(&self) -> usize {
        self.counters.releases.lock().values().sum()
    }
}

impl PdfBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn load(&self, path: &Path, password: &str) -> BackendResult<Box<dyn PdfDocument>> {
        self.counters.loads.fetch_add(1, Ordering::SeqCst);
        let key = path.to_string_lossy().to_string();
        let blueprint = self
            .documents
            .lock()
            .get(&key)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(key.clone()))?;

        if let Some(expected) = &blueprint.password {
            if password.is_empty() {
                return Err(BackendError::PasswordRequired);
            }
            if password != expected {
                return Err(BackendError::PasswordRejected);
            }
        }

        Ok(Box::new(LoadedDocument {
            path: key,
            blueprint,
            counters: Arc::clone(&self.counters),
        }))
    }
}

struct LoadedDocument {
    path: String,
    blueprint: ScriptedDocument,
    counters: Arc<Counters>,
}

impl PdfDocument for LoadedDocument {
    fn page_count(&self) -> usize {
        self.blueprint.pages.len()
    }

    fn extract_page_text(&mut self, page_index: usize) -> BackendResult<String> {
        self.counters.extractions.fetch_add(1, Ordering::SeqCst);

        if self.blueprint.failing_pages.contains(&page_index) {
            return Err(BackendError::Extraction(format!(
                "corrupt content stream on page index {}",
                page_index
            )));
        }
        self.blueprint
            .pages
            .get(page_index)
            .cloned()
            .ok_or_else(|| BackendError::Extraction(format!("no page at index {}", page_index)))
    }

    fn attributes(&self) -> RawAttributes {
        self.blueprint.attributes.clone()
    }
}

impl Drop for LoadedDocument {
    fn drop(&mut self) {
        *self
            .counters
            .releases
            .lock()
            .entry(self.path.clone())
            .or_insert(0) += 1;
    }
}
