use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::error::IoError;

/// Trait for acquiring the complete bytes of a file.
///
/// The decoders never do I/O themselves; whatever supplies the bytes (disk,
/// network, a test fixture) implements this trait. Implementations must be
/// thread-safe so they can be moved into a background worker.
#[async_trait]
pub trait ByteSource: Send + Sync {
    /// Read every byte of the file identified by `id`.
    async fn read_all(&self, id: &str) -> Result<Bytes, IoError>;

    /// Get a unique identifier for this source (for logging).
    fn identifier(&self) -> &str;
}

// =============================================================================
// FileSource
// =============================================================================

/// Reads files from the local filesystem.
///
/// Identifiers are paths. When a root is configured, relative identifiers are
/// resolved against it.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: Option<PathBuf>,
    identifier: String,
}

impl FileSource {
    /// Create a source that uses identifiers as paths verbatim.
    pub fn new() -> Self {
        Self {
            root: None,
            identifier: "file://".to_string(),
        }
    }

    /// Create a source that resolves identifiers against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let identifier = format!("file://{}", root.display());
        Self {
            root: Some(root),
            identifier,
        }
    }

    fn resolve(&self, id: &str) -> PathBuf {
        match self.root {
            Some(ref root) => root.join(id),
            None => Path::new(id).to_path_buf(),
        }
    }
}

impl Default for FileSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ByteSource for FileSource {
    async fn read_all(&self, id: &str) -> Result<Bytes, IoError> {
        let path = self.resolve(id);
        debug!(path = %path.display(), "reading file");

        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(IoError::NotFound(id.to_string()))
            }
            Err(e) => Err(IoError::Read {
                id: id.to_string(),
                message: e.to_string(),
            }),
        }
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}
