//! Typed requests and replies
//!
//! Calls arrive as a method name plus JSON arguments. They are validated
//! into a [`PdfTextRequest`] before they reach the dispatcher.

use serde::{Deserialize, Serialize};

use crate::document::{DocumentError, DocumentMetadata, ErrorCode};

/// Arguments of `initDoc`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitDocArgs {
    pub path: String,
    #[serde(default)]
    pub password: String,
    /// Skip the warm-up extraction pass
    #[serde(default)]
    pub fast_init: bool,
}

/// Arguments of `getDocPageText`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetDocPageTextArgs {
    pub path: String,
    /// 1-indexed page number
    pub number: i64,
}

/// Arguments of `getDocText`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetDocTextArgs {
    pub path: String,
    /// 1-indexed page numbers, in the order the texts are returned
    pub missing_pages_numbers: Vec<i64>,
}

/// A validated request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfTextRequest {
    InitDoc(InitDocArgs),
    GetDocPageText(GetDocPageTextArgs),
    GetDocText(GetDocTextArgs),
}

impl PdfTextRequest {
    /// Wire name of the method
    pub fn method(&self) -> &'static str {
        match self {
            PdfTextRequest::InitDoc(_) => "initDoc",
            PdfTextRequest::GetDocPageText(_) => "getDocPageText",
            PdfTextRequest::GetDocText(_) => "getDocText",
        }
    }

    /// Path of the document the request targets
    pub fn path(&self) -> &str {
        match self {
            PdfTextRequest::InitDoc(args) => &args.path,
            PdfTextRequest::GetDocPageText(args) => &args.path,
            PdfTextRequest::GetDocText(args) => &args.path,
        }
    }
}

/// An untyped call: method name plus JSON arguments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: serde_json::Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }

    /// Validate into a typed request
    ///
    /// Returns `Ok(None)` for methods this service does not implement.
    pub fn parse(self) -> Result<Option<PdfTextRequest>, RequestError> {
        let request = match self.method.as_str() {
            "initDoc" => PdfTextRequest::InitDoc(parse_args(&self.method, self.arguments)?),
            "getDocPageText" => {
                PdfTextRequest::GetDocPageText(parse_args(&self.method, self.arguments)?)
            }
            "getDocText" => PdfTextRequest::GetDocText(parse_args(&self.method, self.arguments)?),
            _ => return Ok(None),
        };
        Ok(Some(request))
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(
    method: &str,
    arguments: serde_json::Value,
) -> Result<T, RequestError> {
    serde_json::from_value(arguments).map_err(|e| {
        RequestError::new(
            ErrorCode::InvalidArguments,
            format!("Invalid arguments for {}: {}", method, e),
        )
    })
}

/// Reply of `initDoc`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitDocReply {
    /// Page count
    pub length: usize,
    pub info: DocumentMetadata,
}

/// Successful reply payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PdfTextReply {
    Document(InitDocReply),
    PageText(String),
    DocumentText(Vec<String>),
}

/// Error delivered to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{code}: {message}")]
pub struct RequestError {
    pub code: ErrorCode,
    pub message: String,
}

impl RequestError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<DocumentError> for RequestError {
    fn from(err: DocumentError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

/// Outcome of an untyped call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodResult {
    Success(PdfTextReply),
    Error(RequestError),
    NotImplemented,
}

impl From<Result<PdfTextReply, RequestError>> for MethodResult {
    fn from(result: Result<PdfTextReply, RequestError>) -> Self {
        match result {
            Ok(reply) => MethodResult::Success(reply),
            Err(err) => MethodResult::Error(err),
        }
    }
}
