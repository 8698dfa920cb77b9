//! Low-level MuPDF wrapper
//!
//! MuPDF's `fz_context` is **NOT thread-safe**. [`SafeDocument`] reopens the
//! document for every operation behind a mutex, so the handle itself can be
//! shared between worker threads.
//!
//! Only compiled with the `mupdf` feature.

mod safe;

pub use safe::SafeDocument;
