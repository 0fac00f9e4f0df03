//! Configuration for the `jpeg-meta` command-line tool.
//!
//! Options come from command-line arguments, with environment variable
//! fallbacks under the `JPEG_META_` prefix:
//!
//! - `JPEG_META_FORMAT` - Output format, `text` or `json` (default: text)
//! - `JPEG_META_THUMBNAIL_DIR` - Directory to write embedded thumbnails to
//! - `JPEG_META_PREVIEW_DIR` - Directory to write square previews to
//! - `JPEG_META_PREVIEW_SIZE` - Preview edge length in pixels (default: 100)
//! - `JPEG_META_PREVIEW_QUALITY` - Preview JPEG quality (default: 80)
//! - `JPEG_META_WORKER` - Read files through the background worker

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};

use crate::preview::{DEFAULT_PREVIEW_QUALITY, DEFAULT_PREVIEW_SIZE};

// =============================================================================
// Default Values
// =============================================================================

/// Largest preview edge length accepted.
pub const MAX_PREVIEW_SIZE: u32 = 4096;

/// Suffix of thumbnail files written to `--thumbnail-dir`.
pub const THUMBNAIL_SUFFIX: &str = "thumb.jpg";

/// Suffix of preview files written to `--preview-dir`.
pub const PREVIEW_SUFFIX: &str = "preview.jpg";

// =============================================================================
// CLI Arguments
// =============================================================================

/// How extracted metadata is printed.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One `section.Name: value` line per tag
    #[default]
    Text,
    /// One JSON object per file
    Json,
}

/// jpeg-meta - Print EXIF, GPS and IPTC metadata of JPEG files.
///
/// Optionally extracts embedded thumbnails and renders square previews.
#[derive(Parser, Debug, Clone)]
#[command(name = "jpeg-meta")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// JPEG files to read.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    // =========================================================================
    // Output Configuration
    // =========================================================================
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, env = "JPEG_META_FORMAT")]
    pub format: OutputFormat,

    /// Write each embedded thumbnail to this directory as `<stem>.thumb.jpg`.
    #[arg(long, env = "JPEG_META_THUMBNAIL_DIR")]
    pub thumbnail_dir: Option<PathBuf>,

    // =========================================================================
    // Preview Configuration
    // =========================================================================
    /// Write a square preview of each file to this directory as
    /// `<stem>.preview.jpg`.
    #[arg(long, env = "JPEG_META_PREVIEW_DIR")]
    pub preview_dir: Option<PathBuf>,

    /// Preview edge length in pixels.
    #[arg(long, default_value_t = DEFAULT_PREVIEW_SIZE, env = "JPEG_META_PREVIEW_SIZE")]
    pub preview_size: u32,

    /// Preview JPEG quality (1-100).
    #[arg(long, default_value_t = DEFAULT_PREVIEW_QUALITY, env = "JPEG_META_PREVIEW_QUALITY")]
    pub preview_quality: u8,

    // =========================================================================
    // I/O Configuration
    // =========================================================================
    /// Read files through a background worker task.
    #[arg(long, default_value_t = false, env = "JPEG_META_WORKER")]
    pub worker: bool,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.files.is_empty() {
            return Err("At least one file is required".to_string());
        }

        if self.preview_size == 0 || self.preview_size > MAX_PREVIEW_SIZE {
            return Err(format!(
                "preview_size must be between 1 and {}",
                MAX_PREVIEW_SIZE
            ));
        }

        if self.preview_quality == 0 || self.preview_quality > 100 {
            return Err("preview_quality must be between 1 and 100".to_string());
        }

        for dir in [&self.thumbnail_dir, &self.preview_dir].into_iter().flatten() {
            if dir.exists() && !dir.is_dir() {
                return Err(format!("{} is not a directory", dir.display()));
            }
        }

        Ok(())
    }

    /// Path of the thumbnail file for `file`, if thumbnails are written.
    pub fn thumbnail_path(&self, file: &Path) -> Option<PathBuf> {
        self.thumbnail_dir
            .as_deref()
            .map(|dir| output_path(dir, file, THUMBNAIL_SUFFIX))
    }

    /// Path of the preview file for `file`, if previews are written.
    pub fn preview_path(&self, file: &Path) -> Option<PathBuf> {
        self.preview_dir
            .as_deref()
            .map(|dir| output_path(dir, file, PREVIEW_SUFFIX))
    }
}

fn output_path(dir: &Path, file: &Path, suffix: &str) -> PathBuf {
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_else(|| "image".into());
    dir.join(format!("{}.{}", stem, suffix))
}

// =============================================================================
// Tests
// =============================================================================
