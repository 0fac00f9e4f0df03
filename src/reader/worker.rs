//! Background byte acquisition.
//!
//! A [`ReadWorker`] owns a [`ByteSource`] on its own tokio task. Callers send
//! a file identifier and get back a [`ReadResponse`] carrying the bytes or an
//! error message. There is no cancellation and no partial result: a request
//! is answered once, in full.

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::LoadError;
use crate::io::ByteSource;

/// Default depth of the request queue.
pub const DEFAULT_QUEUE_DEPTH: usize = 16;

/// Reply to a read request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadResponse {
    /// File contents; empty when `error` is set
    pub result: Bytes,

    /// Why the read failed, if it did
    pub error: Option<String>,
}

impl ReadResponse {
    fn ok(result: Bytes) -> Self {
        Self {
            result,
            error: None,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            result: Bytes::new(),
            error: Some(error),
        }
    }
}

struct ReadRequest {
    id: String,
    reply: oneshot::Sender<ReadResponse>,
}

/// Handle to a task that reads files on behalf of its callers.
///
/// Requests are served in the order they arrive. Dropping every handle (or
/// calling [`shutdown`](Self::shutdown)) lets the task finish once the queue
/// is drained.
pub struct ReadWorker {
    requests: mpsc::Sender<ReadRequest>,
    task: JoinHandle<()>,
}

impl ReadWorker {
    /// Spawn a worker on the current tokio runtime.
    pub fn spawn(source: Arc<dyn ByteSource>) -> Self {
        Self::with_queue_depth(source, DEFAULT_QUEUE_DEPTH)
    }

    /// Spawn a worker whose request queue holds up to `depth` entries.
    pub fn with_queue_depth(source: Arc<dyn ByteSource>, depth: usize) -> Self {
        let (requests, mut queue) = mpsc::channel::<ReadRequest>(depth.max(1));

        let task = tokio::spawn(async move {
            debug!(source = source.identifier(), "Read worker started");

            while let Some(ReadRequest { id, reply }) = queue.recv().await {
                let response = match source.read_all(&id).await {
                    Ok(bytes) => ReadResponse::ok(bytes),
                    Err(e) => {
                        warn!(id = %id, error = %e, "Read failed");
                        ReadResponse::failed(e.to_string())
                    }
                };

                // The caller may have given up waiting
                let _ = reply.send(response);
            }

            debug!("Read worker stopped");
        });

        Self { requests, task }
    }

    /// Ask the worker for the contents of `id`.
    ///
    /// # Errors
    /// `LoadError::Worker` if the worker task is gone. Read failures are
    /// reported inside the response, not here.
    pub async fn read(&self, id: &str) -> Result<ReadResponse, LoadError> {
        let (reply, response) = oneshot::channel();
        let request = ReadRequest {
            id: id.to_string(),
            reply,
        };

        self.requests
            .send(request)
            .await
            .map_err(|_| LoadError::Worker("read worker is not running".to_string()))?;

        response
            .await
            .map_err(|_| LoadError::Worker("read worker dropped the request".to_string()))
    }

    /// Stop accepting requests and wait for queued ones to finish.
    pub async fn shutdown(self) -> Result<(), LoadError> {
        drop(self.requests);
        self.task
            .await
            .map_err(|e| LoadError::Worker(e.to_string()))
    }
}
