//! PDF Text Server Library
//!
//! Text extraction over a single-document cache, with requests dispatched
//! to a bounded pool of blocking workers. The server binary is in main.rs.
//!
//! # Modules
//!
//! - `document`: Backend traits, the document cache, extraction and metadata
//! - `formats`: Concrete PDF backends (lopdf, MuPDF)
//! - `dispatch`: Typed requests, the extraction service and the dispatcher
//! - `routes`: HTTP surface

pub mod config;
pub mod dispatch;
pub mod document;
pub mod error;
pub mod formats;
pub mod routes;
pub mod state;

// Low-level MuPDF wrapper used by the MuPDF backend
#[cfg(feature = "mupdf")]
mod mupdf;
