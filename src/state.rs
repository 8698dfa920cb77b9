//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::dispatch::{PdfTextService, RequestDispatcher};
use crate::document::PdfBackend;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    dispatcher: RequestDispatcher,
}

impl AppState {
    /// Create the application state and start the request dispatcher
    ///
    /// Must be called within a Tokio runtime.
    pub fn new(config: &Config, backend: Arc<dyn PdfBackend>) -> Self {
        let service = PdfTextService::new(backend);
        let dispatcher = RequestDispatcher::start(service, &config.dispatcher);

        Self {
            inner: Arc::new(AppStateInner { dispatcher }),
        }
    }

    /// Get the request dispatcher
    pub fn dispatcher(&self) -> &RequestDispatcher {
        &self.inner.dispatcher
    }

    /// Drain pending requests and release the cached document
    pub async fn shutdown(&self) {
        self.inner.dispatcher.shutdown().await;
    }
}
