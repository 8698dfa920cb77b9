//! Format-specific backend implementations
//!
//! Implementations of the `document` module's backend traits for
//! concrete PDF engines.

pub mod pdf;
