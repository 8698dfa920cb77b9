//! PDF backend implementations
//!
//! Two adapters implement [`PdfBackend`]:
//!
//! - [`LopdfBackend`]: pure Rust, used by default
//! - [`MupdfBackend`]: MuPDF bindings, selected with the `mupdf` feature
//!
//! The backend is chosen at build time; [`default_backend`] returns the
//! one this build was compiled for.

use std::sync::Arc;

use crate::document::PdfBackend;

mod lopdf_backend;
#[cfg(feature = "mupdf")]
mod mupdf_backend;

pub use lopdf_backend::{LopdfBackend, LopdfDocument};
#[cfg(feature = "mupdf")]
pub use mupdf_backend::{MupdfBackend, MupdfDocument};

#[cfg(test)]
pub(crate) use lopdf_backend::tests::write_test_pdf;

/// Backend selected for this build
#[cfg(feature = "mupdf")]
pub type DefaultBackend = MupdfBackend;

/// Backend selected for this build
#[cfg(not(feature = "mupdf"))]
pub type DefaultBackend = LopdfBackend;

/// Create the backend selected for this build
pub fn default_backend() -> Arc<dyn PdfBackend> {
    Arc::new(DefaultBackend::default())
}
