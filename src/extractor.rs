//! Metadata extraction pipeline.
//!
//! ```text
//! bytes ──► SegmentScanner ──► APP1  ──► TiffHeader ─► IfdWalker (IFD0, IFD1) ─► thumbnail
//!                         └──► APP13 ──► IPTC records
//!                         └──► other APPn: skipped
//! ```
//!
//! EXIF problems abort the whole parse. IPTC problems only stop IPTC
//! decoding; whatever was decoded so far is kept.

use bytes::Bytes;
use tracing::{debug, warn};

use crate::error::MetadataError;
use crate::format::iptc::decode_iptc;
use crate::format::jpeg::{SegmentScanner, APP1, APP13};
use crate::format::tiff::{
    exif_tiff_view, DirectoryKind, IfdWalker, TiffHeader, COMPRESSION_JPEG_THUMBNAIL,
};
use crate::io::ByteView;
use crate::metadata::{MetadataResult, Value};

/// Extracts EXIF, GPS and IPTC metadata plus the embedded thumbnail from a
/// complete JPEG file.
///
/// The extractor holds no state; each [`parse`](Self::parse) call builds a
/// fresh [`MetadataResult`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataExtractor;

impl MetadataExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Parse a complete JPEG byte sequence.
    ///
    /// # Errors
    /// Any structural problem on the JPEG or EXIF path. IPTC problems are
    /// never reported here.
    pub fn parse(&self, data: impl Into<Bytes>) -> Result<MetadataResult, MetadataError> {
        let mut result = MetadataResult::default();

        for segment in SegmentScanner::new(data)? {
            let segment = segment?;
            match segment.marker {
                APP1 => read_exif(&segment.payload, &mut result)?,
                APP13 => {
                    if let Err(e) = decode_iptc(&segment.payload, &mut result) {
                        debug!(error = %e, "IPTC decoding stopped early");
                    }
                }
                _ => {}
            }
        }

        debug!(
            exif = result.exif.len(),
            gps = result.gps.len(),
            iptc = result.iptc.len(),
            thumbnail = result.thumbnail.is_some(),
            "Extracted metadata"
        );

        Ok(result)
    }
}

/// Decode one APP1 payload into `result`.
fn read_exif(payload: &ByteView, result: &mut MetadataResult) -> Result<(), MetadataError> {
    let Some(mut tiff) = exif_tiff_view(payload)? else {
        debug!(length = payload.len(), "Skipping non-EXIF APP1 segment");
        return Ok(());
    };

    let header = TiffHeader::parse(&mut tiff)?;
    debug!(byte_order = ?header.byte_order, ifd0 = header.ifd0_offset, "EXIF header");

    let mut walker = IfdWalker::new(&tiff);
    let next = walker.walk(header.ifd0_offset as usize, DirectoryKind::Exif, result)?;

    // IFD1 is the last directory read; its own next pointer is ignored.
    if next != 0 {
        walker.walk(next as usize, DirectoryKind::Exif, result)?;
        result.thumbnail = thumbnail(&tiff, result);
    }

    Ok(())
}

/// Thumbnail bytes if IFD1 describes a JPEG thumbnail inside the payload.
fn thumbnail(tiff: &ByteView, result: &MetadataResult) -> Option<Bytes> {
    let tag = |name: &str| result.exif.get(name).and_then(Value::as_u32);

    if tag("Compression")? != COMPRESSION_JPEG_THUMBNAIL {
        return None;
    }
    let offset = tag("ThumbnailOffset").filter(|&v| v != 0)? as usize;
    let size = tag("ThumbnailSize").filter(|&v| v != 0)? as usize;

    match tiff.slice(offset, offset.saturating_add(size)) {
        Ok(view) => Some(Bytes::copy_from_slice(view.as_bytes())),
        Err(e) => {
            warn!(offset, size, error = %e, "Thumbnail range outside EXIF payload");
            None
        }
    }
}
