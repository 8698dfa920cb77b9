//! Request dispatch for the PDF text operations
//!
//! ```text
//! MethodCall ──parse──▶ PdfTextRequest ──▶ RequestDispatcher ──▶ PdfTextService
//!                                              (bounded queue,       │
//!                                               worker limit)        ▼
//!                                                              DocumentCache
//! ```
//!
//! # Methods
//!
//! | Method           | Arguments                                   | Reply                 |
//! |------------------|---------------------------------------------|-----------------------|
//! | `initDoc`        | `path`, `password`, `fastInit`              | `{length, info}`      |
//! | `getDocPageText` | `path`, `number`                            | page text             |
//! | `getDocText`     | `path`, `missingPagesNumbers`               | list of page texts    |
//!
//! Any other method name yields [`MethodResult::NotImplemented`].

mod dispatcher;
mod request;
mod service;

pub use dispatcher::RequestDispatcher;
pub use request::{
    GetDocPageTextArgs, GetDocTextArgs, InitDocArgs, InitDocReply, MethodCall, MethodResult,
    PdfTextReply, PdfTextRequest, RequestError,
};
pub use service::PdfTextService;
