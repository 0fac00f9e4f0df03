//! # jpeg-meta
//!
//! Extracts camera and publishing metadata from JPEG files: EXIF and GPS
//! tags, IPTC datasets and the embedded EXIF thumbnail.
//!
//! The decoder works on a complete in-memory byte sequence and does no I/O.
//! Everything untrusted is bounds-checked; a malformed file produces an error,
//! never a panic.
//!
//! ## Features
//!
//! - **Segment scanning**: walks the APPn segments at the head of the file
//!   and stops at the first image segment
//! - **EXIF/GPS**: byte-order aware TIFF decoding of IFD0, IFD1, the EXIF
//!   SubIFD and the GPS IFD
//! - **IPTC**: standard and extended-length records from APP13
//! - **Thumbnails and previews**: raw thumbnail extraction plus square,
//!   orientation-corrected JPEG previews
//!
//! ## Architecture
//!
//! - [`io`] - Byte views with endian-aware reads, and byte sources
//! - [`mod@format`] - JPEG segment, TIFF/IFD and IPTC decoders
//! - [`extractor`] - One-pass orchestration producing a [`MetadataResult`]
//! - [`reader`] - File loading, optionally through a background worker
//! - [`preview`] - Preview rendering
//! - [`config`] - CLI configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use jpeg_meta::MetadataExtractor;
//!
//! let data = std::fs::read("photo.jpg").unwrap();
//! let metadata = MetadataExtractor::new().parse(data).unwrap();
//!
//! if let Some(make) = metadata.exif.get("Make") {
//!     println!("Camera: {}", make);
//! }
//! ```

pub mod config;
pub mod error;
pub mod extractor;
pub mod format;
pub mod io;
pub mod metadata;
pub mod preview;
pub mod reader;

// Re-export commonly used types
pub use config::{Config, OutputFormat};
pub use error::{IoError, IptcError, LoadError, MetadataError, PreviewError};
pub use extractor::MetadataExtractor;
pub use format::tiff::{ByteOrder, DataFormat, DirectoryKind, TiffHeader};
pub use format::{decode_iptc, has_soi, Segment, SegmentScanner};
pub use io::{ByteSource, ByteView, FileSource};
pub use metadata::{IptcValue, MetadataResult, Value};
pub use preview::{rotation_degrees, PreviewRenderer, DEFAULT_PREVIEW_QUALITY, DEFAULT_PREVIEW_SIZE};
pub use reader::{is_jpeg_name, JpegReader, LoadedJpeg, ReadResponse, ReadWorker};
