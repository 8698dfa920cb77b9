//! Asynchronous request dispatcher
//!
//! Requests are queued on a bounded channel. A pump task takes them in
//! arrival order and runs each one on the blocking thread pool, holding a
//! semaphore permit so that at most `workers` requests execute at once.
//! Replies travel back over a oneshot channel.
//!
//! ```text
//! caller ──send──▶ [bounded queue] ──▶ pump ──permit──▶ spawn_blocking
//!    ▲                                                      │
//!    └──────────────────── oneshot reply ◀──────────────────┘
//! ```

use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot, Semaphore};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::DispatcherConfig;
use crate::document::{CacheStats, ErrorCode};

use super::request::{MethodCall, MethodResult, PdfTextReply, PdfTextRequest, RequestError};
use super::service::PdfTextService;

type Reply = Result<PdfTextReply, RequestError>;

struct Job {
    id: Uuid,
    request: PdfTextRequest,
    reply: oneshot::Sender<Reply>,
}

/// Handle to the dispatcher; cheap to clone
#[derive(Clone)]
pub struct RequestDispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    service: Arc<PdfTextService>,
    sender: Mutex<Option<mpsc::Sender<Job>>>,
    pump: Mutex<Option<JoinHandle<()>>>,
    workers: Arc<Semaphore>,
    max_workers: usize,
}

impl RequestDispatcher {
    /// Start the dispatcher
    ///
    /// Must be called within a Tokio runtime.
    pub fn start(service: PdfTextService, config: &DispatcherConfig) -> Self {
        let max_workers = config.workers.max(1);
        let service = Arc::new(service);
        let workers = Arc::new(Semaphore::new(max_workers));
        let (sender, receiver) = mpsc::channel(config.queue_capacity.max(1));

        let pump = tokio::spawn(pump(receiver, Arc::clone(&service), Arc::clone(&workers)));

        tracing::info!(
            "Request dispatcher started ({} workers, queue capacity {}, {} backend)",
            max_workers,
            config.queue_capacity,
            service.backend_name()
        );

        Self {
            inner: Arc::new(DispatcherInner {
                service,
                sender: Mutex::new(Some(sender)),
                pump: Mutex::new(Some(pump)),
                workers,
                max_workers,
            }),
        }
    }

    /// Queue a request and wait for its reply
    pub async fn call(&self, request: PdfTextRequest) -> Reply {
        let sender = self.inner.sender.lock().clone().ok_or_else(shut_down_error)?;

        let (reply, receiver) = oneshot::channel();
        let job = Job {
            id: Uuid::new_v4(),
            request,
            reply,
        };
        sender.send(job).await.map_err(|_| shut_down_error())?;

        receiver.await.map_err(|_| {
            RequestError::new(
                ErrorCode::DocError,
                "Request worker terminated without a reply",
            )
        })?
    }

    /// Validate and run an untyped call
    pub async fn call_method(&self, call: MethodCall) -> MethodResult {
        let method = call.method.clone();
        match call.parse() {
            Ok(Some(request)) => self.call(request).await.into(),
            Ok(None) => {
                tracing::debug!("Method not implemented: {}", method);
                MethodResult::NotImplemented
            }
            Err(err) => MethodResult::Error(err),
        }
    }

    /// Queue a request and deliver its reply to `on_complete`
    ///
    /// The callback runs as a task on the caller's runtime, never on the
    /// blocking worker that executed the request.
    pub fn dispatch<F>(&self, request: PdfTextRequest, on_complete: F) -> JoinHandle<()>
    where
        F: FnOnce(Reply) + Send + 'static,
    {
        let dispatcher = self.clone();
        tokio::spawn(async move {
            let reply = dispatcher.call(request).await;
            on_complete(reply);
        })
    }

    /// Untyped counterpart of [`dispatch`](Self::dispatch)
    pub fn dispatch_call<F>(&self, call: MethodCall, on_complete: F) -> JoinHandle<()>
    where
        F: FnOnce(MethodResult) + Send + 'static,
    {
        let dispatcher = self.clone();
        tokio::spawn(async move {
            let result = dispatcher.call_method(call).await;
            on_complete(result);
        })
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.service.stats()
    }

    pub fn backend_name(&self) -> &'static str {
        self.inner.service.backend_name()
    }

    /// Requests currently executing
    pub fn active_workers(&self) -> usize {
        self.inner.max_workers - self.inner.workers.available_permits()
    }

    /// Stop accepting requests, drain the queue, then release the cache
    ///
    /// Requests already queued still run. Calls made after this point fail
    /// with `DOC_ERROR`.
    pub async fn shutdown(&self) {
        let sender = self.inner.sender.lock().take();
        if sender.is_none() {
            return;
        }
        drop(sender);

        let pump = self.inner.pump.lock().take();
        if let Some(pump) = pump {
            if let Err(e) = pump.await {
                tracing::error!("Dispatcher pump task failed: {}", e);
            }
        }

        // Wait for in-flight requests to hand back their permits
        match self.inner.workers.acquire_many(self.inner.max_workers as u32).await {
            Ok(permits) => permits.forget(),
            Err(e) => tracing::warn!("Worker semaphore closed during shutdown: {}", e),
        }
        self.inner.workers.close();

        self.inner.service.teardown();
        tracing::info!("Request dispatcher shut down");
    }
}

async fn pump(
    mut receiver: mpsc::Receiver<Job>,
    service: Arc<PdfTextService>,
    workers: Arc<Semaphore>,
) {
    while let Some(job) = receiver.recv().await {
        let permit = match Arc::clone(&workers).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => break,
        };
        let service = Arc::clone(&service);

        tokio::task::spawn_blocking(move || {
            let span = tracing::info_span!(
                "pdf_text_request",
                request_id = %job.id,
                method = job.request.method()
            );
            let _enter = span.enter();

            let started = Instant::now();
            let reply = service.handle(&job.request);
            match &reply {
                Ok(_) => tracing::debug!(
                    "Completed {} for {} in {:?}",
                    job.request.method(),
                    job.request.path(),
                    started.elapsed()
                ),
                Err(e) => tracing::warn!(
                    "{} failed for {}: {}",
                    job.request.method(),
                    job.request.path(),
                    e
                ),
            }

            drop(permit);
            if job.reply.send(reply).is_err() {
                tracing::debug!("Caller dropped before reply was delivered");
            }
        });
    }
    tracing::debug!("Dispatcher queue closed");
}

fn shut_down_error() -> RequestError {
    RequestError::new(ErrorCode::DocError, "Request dispatcher is shut down")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::dispatch::request::{GetDocPageTextArgs, GetDocTextArgs, InitDocArgs};
    use crate::document::testing::{ScriptedBackend, ScriptedDocument};
    use crate::document::PdfBackend;

    fn start_with(backend: &Arc<ScriptedBackend>, workers: usize) -> RequestDispatcher {
        let service = PdfTextService::new(Arc::clone(backend) as Arc<dyn PdfBackend>);
        RequestDispatcher::start(
            service,
            &DispatcherConfig {
                workers,
                queue_capacity: 4,
            },
        )
    }

    fn backend_with_pages() -> Arc<ScriptedBackend> {
        let backend = Arc::new(ScriptedBackend::new());
        backend.add("/a.pdf", ScriptedDocument::with_pages(&["one", "two", "three"]));
        backend.add("/b.pdf", ScriptedDocument::with_pages(&["bee"]));
        backend
    }

    fn page_text(path: &str, number: i64) -> PdfTextRequest {
        PdfTextRequest::GetDocPageText(GetDocPageTextArgs {
            path: path.to_string(),
            number,
        })
    }

    #[tokio::test]
    async fn test_call_returns_reply() {
        let backend = backend_with_pages();
        let dispatcher = start_with(&backend, 2);

        let reply = dispatcher
            .call(PdfTextRequest::InitDoc(InitDocArgs {
                path: "/a.pdf".into(),
                password: String::new(),
                fast_init: true,
            }))
            .await
            .unwrap();

        match reply {
            PdfTextReply::Document(doc) => assert_eq!(doc.length, 3),
            other => panic!("unexpected reply {:?}", other),
        }

        let reply = dispatcher.call(page_text("/a.pdf", 2)).await.unwrap();
        assert_eq!(reply, PdfTextReply::PageText("two".into()));
    }

    #[tokio::test]
    async fn test_error_reply() {
        let backend = backend_with_pages();
        let dispatcher = start_with(&backend, 1);

        let err = dispatcher.call(page_text("/missing.pdf", 1)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidPath);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_calls_all_complete() {
        let backend = backend_with_pages();
        let dispatcher = start_with(&backend, 3);

        let mut handles = Vec::new();
        for i in 0..32 {
            let dispatcher = dispatcher.clone();
            let path = if i % 2 == 0 { "/a.pdf" } else { "/b.pdf" };
            handles.push(tokio::spawn(async move {
                dispatcher.call(page_text(path, 1)).await
            }));
        }

        for (i, handle) in handles.into_iter().enumerate() {
            let reply = handle.await.unwrap().unwrap();
            let expected = if i % 2 == 0 { "one" } else { "bee" };
            assert_eq!(reply, PdfTextReply::PageText(expected.into()));
        }

        // Every load except the one still cached has been released
        assert_eq!(backend.total_release_count(), backend.load_count() - 1);
        assert_eq!(dispatcher.active_workers(), 0);
    }

    #[tokio::test]
    async fn test_dispatch_invokes_callback() {
        let backend = backend_with_pages();
        let dispatcher = start_with(&backend, 1);
        let (tx, rx) = oneshot::channel();

        dispatcher.dispatch(
            PdfTextRequest::GetDocText(GetDocTextArgs {
                path: "/a.pdf".into(),
                missing_pages_numbers: vec![3, 99, 1],
            }),
            move |reply| {
                let _ = tx.send(reply);
            },
        );

        let reply = rx.await.unwrap().unwrap();
        assert_eq!(
            reply,
            PdfTextReply::DocumentText(vec!["three".into(), "".into(), "one".into()])
        );
    }

    #[tokio::test]
    async fn test_dispatch_call_not_implemented() {
        let backend = backend_with_pages();
        let dispatcher = start_with(&backend, 1);
        let (tx, rx) = oneshot::channel();

        dispatcher.dispatch_call(MethodCall::new("closeDoc", json!({})), move |result| {
            let _ = tx.send(result);
        });

        assert_eq!(rx.await.unwrap(), MethodResult::NotImplemented);
        assert_eq!(backend.load_count(), 0);
    }

    #[tokio::test]
    async fn test_call_method_invalid_arguments() {
        let backend = backend_with_pages();
        let dispatcher = start_with(&backend, 1);

        let result = dispatcher
            .call_method(MethodCall::new("getDocText", json!({ "path": "/a.pdf" })))
            .await;

        match result {
            MethodResult::Error(err) => assert_eq!(err.code, ErrorCode::InvalidArguments),
            other => panic!("unexpected result {:?}", other),
        }
    }

    struct PanickingBackend;

    impl PdfBackend for PanickingBackend {
        fn name(&self) -> &'static str {
            "panicking"
        }

        fn load(
            &self,
            _path: &std::path::Path,
            _password: &str,
        ) -> crate::document::BackendResult<Box<dyn crate::document::PdfDocument>> {
            panic!("backend crashed");
        }
    }

    #[tokio::test]
    async fn test_worker_panic_yields_doc_error() {
        let service = PdfTextService::new(Arc::new(PanickingBackend));
        let dispatcher = RequestDispatcher::start(
            service,
            &DispatcherConfig {
                workers: 1,
                queue_capacity: 1,
            },
        );

        let err = dispatcher.call(page_text("/a.pdf", 1)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DocError);

        // The permit is returned, so the next request still runs
        let err = dispatcher.call(page_text("/a.pdf", 1)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DocError);
    }

    #[tokio::test]
    async fn test_shutdown_releases_cache_and_rejects_calls() {
        let backend = backend_with_pages();
        let dispatcher = start_with(&backend, 2);

        dispatcher.call(page_text("/a.pdf", 1)).await.unwrap();
        dispatcher.shutdown().await;

        assert_eq!(backend.release_count("/a.pdf"), 1);
        assert!(dispatcher.stats().cached_path.is_none());

        let err = dispatcher.call(page_text("/a.pdf", 1)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DocError);

        // Second shutdown is a no-op
        dispatcher.shutdown().await;
    }
}
