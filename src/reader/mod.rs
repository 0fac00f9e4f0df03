//! Loading JPEG files and extracting their metadata.
//!
//! [`JpegReader`] ties the pieces together: it checks that an identifier
//! names a JPEG, acquires the bytes (directly or through a [`ReadWorker`]),
//! and runs the decoder on the blocking thread pool.

mod worker;

pub use worker::{ReadResponse, ReadWorker, DEFAULT_QUEUE_DEPTH};

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;

use crate::error::{IoError, LoadError, MetadataError};
use crate::extractor::MetadataExtractor;
use crate::io::ByteSource;
use crate::metadata::MetadataResult;

/// File extensions accepted as JPEG, compared case-insensitively.
pub const JPEG_EXTENSIONS: &[&str] = &["jpg", "jpeg", "jpe", "pjpg", "pjpeg"];

/// Whether `id` ends in one of the [`JPEG_EXTENSIONS`].
pub fn is_jpeg_name(id: &str) -> bool {
    Path::new(id)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| JPEG_EXTENSIONS.iter().any(|j| ext.eq_ignore_ascii_case(j)))
        .unwrap_or(false)
}

/// A loaded file and the outcome of decoding it.
///
/// Acquisition succeeded if this exists at all; `metadata` carries the
/// decode result separately so the caller still has the bytes (to render a
/// preview from, say) when the EXIF data is broken.
#[derive(Debug, Clone)]
pub struct LoadedJpeg {
    /// Identifier the file was loaded under
    pub id: String,

    /// Complete file contents
    pub bytes: Bytes,

    /// Decoded metadata, or why decoding failed
    pub metadata: Result<MetadataResult, MetadataError>,
}

enum Acquire {
    Direct(Arc<dyn ByteSource>),
    Worker(ReadWorker),
}

/// Loads JPEG files from a [`ByteSource`] and extracts their metadata.
pub struct JpegReader {
    acquire: Acquire,
    extractor: MetadataExtractor,
}

impl JpegReader {
    /// Read files directly from `source` on the calling task.
    pub fn new(source: Arc<dyn ByteSource>) -> Self {
        Self {
            acquire: Acquire::Direct(source),
            extractor: MetadataExtractor::new(),
        }
    }

    /// Read files through a background [`ReadWorker`].
    ///
    /// Must be called from within a tokio runtime.
    pub fn with_worker(source: Arc<dyn ByteSource>) -> Self {
        Self {
            acquire: Acquire::Worker(ReadWorker::spawn(source)),
            extractor: MetadataExtractor::new(),
        }
    }

    /// Whether reads go through a background worker.
    pub fn uses_worker(&self) -> bool {
        matches!(self.acquire, Acquire::Worker(_))
    }

    /// Load `id` and decode its metadata.
    ///
    /// # Errors
    /// - `NotJpeg` if the identifier does not have a JPEG extension
    /// - `Io` if the bytes cannot be acquired
    /// - `Worker` if the worker or the decode task fails
    ///
    /// A decode failure is not an error here; see [`LoadedJpeg::metadata`].
    pub async fn load(&self, id: &str) -> Result<LoadedJpeg, LoadError> {
        if !is_jpeg_name(id) {
            return Err(LoadError::NotJpeg(id.to_string()));
        }

        let bytes = self.acquire(id).await?;
        debug!(id, size = bytes.len(), "Acquired file");

        let extractor = self.extractor;
        let input = bytes.clone();
        let metadata = tokio::task::spawn_blocking(move || extractor.parse(input))
            .await
            .map_err(|e| LoadError::Worker(e.to_string()))?;

        if let Err(ref e) = metadata {
            debug!(id, error = %e, "Metadata extraction failed");
        }

        Ok(LoadedJpeg {
            id: id.to_string(),
            bytes,
            metadata,
        })
    }

    async fn acquire(&self, id: &str) -> Result<Bytes, LoadError> {
        match &self.acquire {
            Acquire::Direct(source) => Ok(source.read_all(id).await?),
            Acquire::Worker(worker) => {
                let response = worker.read(id).await?;
                match response.error {
                    None => Ok(response.result),
                    Some(message) => Err(LoadError::Io(IoError::Read {
                        id: id.to_string(),
                        message,
                    })),
                }
            }
        }
    }

    /// Stop the background worker, if there is one.
    pub async fn shutdown(self) -> Result<(), LoadError> {
        match self.acquire {
            Acquire::Direct(_) => Ok(()),
            Acquire::Worker(worker) => worker.shutdown().await,
        }
    }
}
